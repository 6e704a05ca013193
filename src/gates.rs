//! Gate tensors used by the QAOA ansatz.
//!
//! Gates are resolved by name through a global registry, so tensor data can refer
//! to a gate lazily (see [`TensorData::Gate`]) and only materialize the dense
//! array when it is contracted. Diagonal gates are stored compressed: a diagonal
//! gate acting on `k` qubits is a rank-`k` tensor holding the diagonal only.
//!
//! Rotation angles are in radians: `xphase(alpha)` is `exp(-i alpha/2 X)` and
//! `zz(alpha)` is `exp(-i alpha/2 Z⊗Z)`. The QAOA circuits pass `alpha = 2 gamma`
//! and `alpha = 2 beta`.
//!
//! [`TensorData::Gate`]: crate::tensornetwork::tensordata::TensorData::Gate
use lazy_static::lazy_static;
use ndarray::{arr1, arr2, ArrayD};
use num_complex::Complex64;

use std::{
    borrow::Borrow,
    collections::HashSet,
    f64::consts::FRAC_1_SQRT_2,
    hash::{Hash, Hasher},
};

use crate::error::{QaoaError, Result};

/// Dense complex data of a tensor. Axes are in row-major order.
pub type DataTensor = ArrayD<Complex64>;

lazy_static! {
    static ref GATES: HashSet<Box<dyn Gate>> = {
        let mut gates = HashSet::new();
        gates.insert(Box::new(X) as _);
        gates.insert(Box::new(Z) as _);
        gates.insert(Box::new(H) as _);
        gates.insert(Box::new(XPhase) as _);
        gates.insert(Box::new(ZzPhase) as _);
        gates
    };
}

/// Looks up `gate`, checks the number of angles and runs `f` on it.
fn with_gate<T>(gate: &str, angles: &[f64], f: impl FnOnce(&dyn Gate) -> T) -> Result<T> {
    let gate = GATES
        .get(gate)
        .ok_or_else(|| QaoaError::UnknownGate(gate.to_owned()))?;
    if gate.num_angles() != angles.len() {
        return Err(QaoaError::GateArity {
            gate: gate.name().to_owned(),
            expected: gate.num_angles(),
            actual: angles.len(),
        });
    }
    Ok(f(gate.as_ref()))
}

/// Computes the gate tensor for the given gate and angles.
pub fn load_gate(gate: &str, angles: &[f64]) -> Result<DataTensor> {
    with_gate(gate, angles, |g| g.compute(angles))
}

/// Computes the adjoint of the gate tensor for the given gate and angles.
pub fn load_gate_adjoint(gate: &str, angles: &[f64]) -> Result<DataTensor> {
    with_gate(gate, angles, |g| g.adjoint(angles))
}

/// Returns whether the given gate is known and diagonal in the computational basis.
#[must_use]
pub fn is_gate_diagonal(gate: &str) -> bool {
    GATES.get(gate).is_some_and(|g| g.is_diagonal())
}

/// Computes the adjoint (conjugate transpose) of a data tensor. The tensor can be
/// a matrix, or be split in dimensions of size 2, e.g. `(8, 8)` or `(2, 2, 2, 2, 2, 2)`.
/// Rank-1 tensors are simply conjugated.
#[must_use]
pub fn matrix_adjoint(data: DataTensor) -> DataTensor {
    let rank = data.ndim();
    assert!(
        rank <= 1 || rank % 2 == 0,
        "Adjoint needs an even number of axes, got {rank}"
    );
    let half = rank / 2;
    let perm = (half..rank).chain(0..half).collect::<Vec<_>>();
    data.permuted_axes(perm).mapv(|c| c.conj())
}

/// A quantum gate.
pub trait Gate: Send + Sync {
    /// Returns the name of the gate.
    fn name(&self) -> &str;

    /// The number of angles the gate takes.
    fn num_angles(&self) -> usize {
        0
    }

    /// Whether the gate is diagonal. Diagonal gates are stored compressed, with
    /// one axis per qubit instead of an input and an output axis.
    fn is_diagonal(&self) -> bool {
        false
    }

    /// Computes the gate tensor with the given angles. The angle count has been
    /// checked against [`Gate::num_angles`].
    fn compute(&self, angles: &[f64]) -> DataTensor;

    /// Computes the adjoint of the gate tensor with the given angles. If not
    /// overridden, this computes the conjugate transpose of the gate matrix.
    fn adjoint(&self, angles: &[f64]) -> DataTensor {
        matrix_adjoint(self.compute(angles))
    }
}

impl PartialEq for dyn Gate {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for dyn Gate {}

impl Hash for dyn Gate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// This allows us to use a `&str` as a key in a `HashSet` of gates.
impl Borrow<str> for Box<dyn Gate> {
    fn borrow(&self) -> &str {
        self.name()
    }
}

/// The Pauli-X gate.
struct X;
impl Gate for X {
    fn name(&self) -> &str {
        "x"
    }

    fn compute(&self, _angles: &[f64]) -> DataTensor {
        let z = Complex64::ZERO;
        let o = Complex64::ONE;
        arr2(&[[z, o], [o, z]]).into_dyn()
    }
}

/// The Pauli-Z gate, stored as its diagonal.
struct Z;
impl Gate for Z {
    fn name(&self) -> &str {
        "z"
    }

    fn is_diagonal(&self) -> bool {
        true
    }

    fn compute(&self, _angles: &[f64]) -> DataTensor {
        arr1(&[Complex64::ONE, -Complex64::ONE]).into_dyn()
    }
}

/// The Hadamard gate.
struct H;
impl Gate for H {
    fn name(&self) -> &str {
        "h"
    }

    fn compute(&self, _angles: &[f64]) -> DataTensor {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        arr2(&[[h, h], [h, -h]]).into_dyn()
    }
}

/// The X-phase (mixer) gate `exp(-i alpha/2 X)`.
struct XPhase;
impl Gate for XPhase {
    fn name(&self) -> &str {
        "xphase"
    }

    fn num_angles(&self) -> usize {
        1
    }

    fn compute(&self, angles: &[f64]) -> DataTensor {
        let (sin, cos) = (angles[0] / 2.0).sin_cos();
        let c = Complex64::new(cos, 0.0);
        let s = Complex64::new(0.0, -sin);
        arr2(&[[c, s], [s, c]]).into_dyn()
    }

    fn adjoint(&self, angles: &[f64]) -> DataTensor {
        self.compute(&[-angles[0]])
    }
}

/// The two-qubit ZZ-phase gate `exp(-i alpha/2 Z⊗Z)`, stored as its diagonal
/// indexed by the two qubit values.
struct ZzPhase;
impl Gate for ZzPhase {
    fn name(&self) -> &str {
        "zz"
    }

    fn num_angles(&self) -> usize {
        1
    }

    fn is_diagonal(&self) -> bool {
        true
    }

    fn compute(&self, angles: &[f64]) -> DataTensor {
        let same = Complex64::from_polar(1.0, -angles[0] / 2.0);
        let different = same.conj();
        arr2(&[[same, different], [different, same]]).into_dyn()
    }

    fn adjoint(&self, angles: &[f64]) -> DataTensor {
        self.compute(&[-angles[0]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use float_cmp::approx_eq;
    use ndarray::{Array2, Ix2};

    fn assert_close(a: &DataTensor, b: &DataTensor) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b) {
            assert!(approx_eq!(f64, x.re, y.re, epsilon = 1e-12), "{a} != {b}");
            assert!(approx_eq!(f64, x.im, y.im, epsilon = 1e-12), "{a} != {b}");
        }
    }

    fn as_matrix(t: DataTensor) -> Array2<Complex64> {
        t.into_dimensionality::<Ix2>().unwrap()
    }

    #[test]
    fn hadamard_is_self_adjoint_and_unitary() {
        let h = load_gate("h", &[]).unwrap();
        assert_close(&h, &matrix_adjoint(h.clone()));
        let h = as_matrix(h);
        let identity = Array2::<Complex64>::eye(2).into_dyn();
        assert_close(&h.dot(&h).into_dyn(), &identity);
    }

    #[test]
    fn xphase_negated_angle_is_conjugate() {
        for alpha in [0.3, -1.7, 2.9] {
            let x = load_gate("xphase", &[alpha]).unwrap();
            let negated = load_gate("xphase", &[-alpha]).unwrap();
            assert_close(&negated, &x.mapv(|c| c.conj()));
            assert_close(&load_gate_adjoint("xphase", &[alpha]).unwrap(), &negated);
            let x = as_matrix(x);
            let x_dag = as_matrix(matrix_adjoint(x.clone().into_dyn()));
            assert_close(
                &x.dot(&x_dag).into_dyn(),
                &Array2::<Complex64>::eye(2).into_dyn(),
            );
        }
    }

    #[test]
    fn zz_is_diagonal_and_symmetric() {
        assert!(is_gate_diagonal("zz"));
        assert!(!is_gate_diagonal("xphase"));
        let zz = load_gate("zz", &[0.8]).unwrap();
        assert_eq!(zz.shape(), &[2, 2]);
        assert_close(&zz, &zz.t().to_owned());
        assert_close(
            &load_gate_adjoint("zz", &[0.8]).unwrap(),
            &zz.mapv(|c| c.conj()),
        );
        // Equal qubit values pick up exp(-i alpha/2)
        assert!(approx_eq!(f64, zz[[0, 0]].arg(), -0.4, epsilon = 1e-12));
        assert!(approx_eq!(f64, zz[[0, 1]].arg(), 0.4, epsilon = 1e-12));
    }

    #[test]
    fn adjoint_of_rank_one_conjugates() {
        let v = arr1(&[Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)]).into_dyn();
        let expected = arr1(&[Complex64::new(1.0, -2.0), Complex64::new(0.0, 1.0)]).into_dyn();
        assert_close(&matrix_adjoint(v), &expected);
    }

    #[test]
    fn unknown_gate() {
        assert!(!is_gate_diagonal("fsim"));
        assert!(matches!(
            load_gate("fsim", &[]),
            Err(QaoaError::UnknownGate(name)) if name == "fsim"
        ));
    }

    #[test]
    fn wrong_arity() {
        assert!(matches!(
            load_gate("zz", &[]),
            Err(QaoaError::GateArity {
                expected: 1,
                actual: 0,
                ..
            })
        ));
    }

    #[test]
    fn pauli_gates_are_self_adjoint() {
        for gate in ["x", "z", "h"] {
            let g = load_gate(gate, &[]).unwrap();
            assert_close(&load_gate_adjoint(gate, &[]).unwrap(), &g);
        }
        assert!(is_gate_diagonal("z"));
    }

    #[test]
    fn angles_are_in_radians() {
        // xphase(pi) = -i X
        let x = load_gate("xphase", &[PI]).unwrap();
        let z = Complex64::ZERO;
        let minus_i = Complex64::new(0.0, -1.0);
        assert_close(&x, &arr2(&[[z, minus_i], [minus_i, z]]).into_dyn());
        // zz(2 pi) = -1
        let zz = load_gate("zz", &[2.0 * PI]).unwrap();
        assert_close(&zz, &arr2(&[[-Complex64::ONE; 2]; 2]).into_dyn());
    }
}
