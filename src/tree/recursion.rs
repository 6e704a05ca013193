//! The recursion over the levels of a regular tree.
//!
//! Every vertex at distance `k` from the measured edge sees the same subtree, so
//! the contracted lightcone of its subtree only depends on `k`. The accumulator of
//! level `k` is the X unit of a vertex multiplied element-wise with the
//! accumulators of its `degree - 1` children, pushed through the ZZ unit of the
//! edge to its parent.

use log::debug;
use ndarray::Array2;
use num_complex::Complex64;

use crate::{
    error::{QaoaError, Result},
    tree::units::{x_energy, x_unit, ZzUnit},
    types::{Observable, QaoaParams},
};

/// Number of neighbours of every inner vertex if not stated otherwise.
pub const DEFAULT_DEGREE: usize = 3;

/// Multiplies `x` element-wise with `children` copies of `t`.
fn branch(x: &Array2<Complex64>, t: &Array2<Complex64>, children: usize) -> Array2<Complex64> {
    let mut y = x.clone();
    for _ in 0..children {
        y *= t;
    }
    y
}

/// Contracts the lightcone of one edge of a regular tree level by level.
///
/// The units depend only on the angles, so they are built once and shared by
/// all levels.
#[derive(Debug, Clone)]
pub struct TreeContractor {
    params: QaoaParams,
    degree: usize,
    zz: ZzUnit,
    x: Array2<Complex64>,
}

impl TreeContractor {
    /// Builds the units for `params` on a tree where every inner vertex has
    /// `degree` neighbours.
    ///
    /// # Errors
    /// Returns [`QaoaError::InvalidDegree`] if `degree < 2`.
    pub fn new(params: &QaoaParams, degree: usize) -> Result<Self> {
        if degree < 2 {
            return Err(QaoaError::InvalidDegree(degree));
        }
        Ok(Self {
            params: params.clone(),
            degree,
            zz: ZzUnit::new(params.gamma())?,
            x: x_unit(params.beta())?,
        })
    }

    /// The number of QAOA rounds.
    #[inline]
    pub fn layers(&self) -> usize {
        self.params.layers()
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The accumulator of a leaf vertex: its X unit pushed through the edge to its
    /// parent.
    #[must_use]
    pub fn last_contraction(&self) -> Array2<Complex64> {
        self.zz.propagate(&self.x)
    }

    /// The accumulator of a vertex with `depth` further levels below it.
    #[must_use]
    pub fn recursive_step(&self, depth: usize) -> Array2<Complex64> {
        let Some(child_depth) = depth.checked_sub(1) else {
            return self.last_contraction();
        };
        let t = self.recursive_step(child_depth);
        self.zz
            .propagate(&branch(&self.x, &t, self.degree - 1))
    }

    /// The expectation value of `observable ⊗ observable` on the root edge of a tree
    /// that reaches `layers()` levels beyond the root edge, i.e., the whole
    /// lightcone.
    pub fn expectation(&self, observable: Observable) -> Result<Complex64> {
        self.expectation_at_depth(self.layers(), observable)
    }

    /// The expectation value on the root edge of a tree with `depth` levels beyond
    /// the root edge. A depth of 0 is the bare edge. For `depth >= layers()` the
    /// value does not depend on `depth` any more.
    pub fn expectation_at_depth(&self, depth: usize, observable: Observable) -> Result<Complex64> {
        let energy = x_energy(self.params.beta(), observable)?;
        let y = match depth.checked_sub(1) {
            Some(child_depth) => {
                let t = self.recursive_step(child_depth);
                branch(&energy, &t, self.degree - 1)
            }
            None => energy,
        };
        let m = self.zz.propagate(&y);
        debug!(
            elements = m.len(),
            gb = m.len() as f64 * 16.0 / 1e9,
            depth = depth;
            "Contracting top level"
        );
        Ok((&m * &y).sum())
    }
}

/// The expectation value of `observable ⊗ observable` on the root edge of a
/// 3-regular tree after the QAOA circuit with `params`.
///
/// # Examples
/// ```
/// # use bethe_qaoa::tree::recursion::tree_expectation;
/// # use bethe_qaoa::types::{Observable, QaoaParams};
/// let params = QaoaParams::new(vec![0.4, -0.1], vec![0.3, 0.8]).unwrap();
/// let norm = tree_expectation(&params, Observable::IDENTITY).unwrap();
/// assert!((norm.re - 1.0).abs() < 1e-12);
/// ```
pub fn tree_expectation(params: &QaoaParams, observable: Observable) -> Result<Complex64> {
    TreeContractor::new(params, DEFAULT_DEGREE)?.expectation(observable)
}

/// The accumulator of level `depth` on a 3-regular tree.
pub fn recursive_step(depth: usize, params: &QaoaParams) -> Result<Array2<Complex64>> {
    Ok(TreeContractor::new(params, DEFAULT_DEGREE)?.recursive_step(depth))
}

/// The accumulator of a leaf vertex.
pub fn last_contraction(params: &QaoaParams) -> Result<Array2<Complex64>> {
    Ok(TreeContractor::new(params, DEFAULT_DEGREE)?.last_contraction())
}
