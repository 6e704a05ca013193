//! Parameters of a QAOA run and the observables measured on its output.

use std::f64::consts::PI;

use ndarray::Array1;
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QaoaError, Result};

/// The angles of a depth-`p` QAOA circuit.
///
/// `gamma[k]` parameterizes the ZZ-phase layer and `beta[k]` the X-phase layer
/// of round `k`, where round 0 is applied first. Both sequences always have the
/// same, non-zero length and contain only finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQaoaParams")]
pub struct QaoaParams {
    gamma: Vec<f64>,
    beta: Vec<f64>,
}

impl QaoaParams {
    /// Creates validated QAOA parameters.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::types::QaoaParams;
    /// let params = QaoaParams::new(vec![0.1, 0.2], vec![0.3, 0.4]).unwrap();
    /// assert_eq!(params.layers(), 2);
    /// assert!(QaoaParams::new(vec![0.1], vec![]).is_err());
    /// ```
    pub fn new(gamma: Vec<f64>, beta: Vec<f64>) -> Result<Self> {
        if gamma.len() != beta.len() {
            return Err(QaoaError::AngleLengthMismatch {
                gamma: gamma.len(),
                beta: beta.len(),
            });
        }
        if gamma.is_empty() {
            return Err(QaoaError::EmptyAngles);
        }
        if let Some(angle) = gamma.iter().chain(&beta).find(|a| !a.is_finite()) {
            return Err(QaoaError::NonFiniteAngle(*angle));
        }
        Ok(Self { gamma, beta })
    }

    /// Draws `layers` angles of each kind uniformly from `[-pi, pi)`.
    pub fn random<R>(layers: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng,
    {
        let gamma = (0..layers).map(|_| rng.random_range(-PI..PI)).collect();
        let beta = (0..layers).map(|_| rng.random_range(-PI..PI)).collect();
        Self::new(gamma, beta)
    }

    /// The number of QAOA rounds `p`.
    #[inline]
    pub fn layers(&self) -> usize {
        self.gamma.len()
    }

    /// The ZZ-phase angles.
    #[inline]
    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }

    /// The X-phase angles.
    #[inline]
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }
}

#[derive(Deserialize)]
struct RawQaoaParams {
    gamma: Vec<f64>,
    beta: Vec<f64>,
}

impl TryFrom<RawQaoaParams> for QaoaParams {
    type Error = QaoaError;

    fn try_from(raw: RawQaoaParams) -> Result<Self> {
        Self::new(raw.gamma, raw.beta)
    }
}

/// A diagonal single-qubit observable, given by its two eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observable([f64; 2]);

impl Observable {
    /// The Pauli-Z observable, `diag(1, -1)`.
    pub const PAULI_Z: Self = Self([1.0, -1.0]);

    /// The identity, `diag(1, 1)`. Its expectation value is the norm of the state.
    pub const IDENTITY: Self = Self([1.0, 1.0]);

    /// Creates an observable from its diagonal.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::types::Observable;
    /// assert_eq!(Observable::new(&[1.0, -1.0]).unwrap(), Observable::PAULI_Z);
    /// assert!(Observable::new(&[1.0, 0.0, 0.0]).is_err());
    /// ```
    pub fn new(diagonal: &[f64]) -> Result<Self> {
        match diagonal {
            [a, b] => Ok(Self([*a, *b])),
            _ => Err(QaoaError::ObservableDimension {
                expected: 2,
                actual: diagonal.len(),
            }),
        }
    }

    /// The eigenvalues of the observable.
    #[inline]
    pub fn diagonal(&self) -> [f64; 2] {
        self.0
    }

    /// The diagonal as a complex vector, ready to be contracted.
    pub fn to_tensor(&self) -> Array1<Complex64> {
        self.0.iter().map(|&v| Complex64::new(v, 0.0)).collect()
    }
}

impl Default for Observable {
    fn default() -> Self {
        Self::PAULI_Z
    }
}
