//! The recursion on doubled tensors, where the ket and bra layers of a vertex share
//! one vector of length `4^p` and the ZZ layers of an edge form a single
//! `4^p x 4^p` matrix.
//!
//! This needs quadratically more memory than [`crate::tree::recursion`] and is
//! kept as an independent cross-check of the factored units.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::{
    error::{QaoaError, Result},
    tree::{
        layers::{x_sandwich_traced, x_sandwich_weighted, zz_sandwich},
        recursion::DEFAULT_DEGREE,
    },
    types::{Observable, QaoaParams},
};

fn branch(x: &Array1<Complex64>, t: &Array1<Complex64>, children: usize) -> Array1<Complex64> {
    let mut y = x.clone();
    for _ in 0..children {
        y *= t;
    }
    y
}

/// Recursive contraction with doubled tensors.
#[derive(Debug, Clone)]
pub struct SandwichContractor {
    params: QaoaParams,
    degree: usize,
    zz: Array2<Complex64>,
    x: Array1<Complex64>,
}

impl SandwichContractor {
    /// # Errors
    /// Returns [`QaoaError::InvalidDegree`] if `degree < 2`.
    pub fn new(params: &QaoaParams, degree: usize) -> Result<Self> {
        if degree < 2 {
            return Err(QaoaError::InvalidDegree(degree));
        }
        Ok(Self {
            params: params.clone(),
            degree,
            zz: zz_sandwich(params.gamma())?,
            x: x_sandwich_traced(params.beta())?,
        })
    }

    #[must_use]
    pub fn last_contraction(&self) -> Array1<Complex64> {
        self.zz.dot(&self.x)
    }

    #[must_use]
    pub fn recursive_step(&self, depth: usize) -> Array1<Complex64> {
        let Some(child_depth) = depth.checked_sub(1) else {
            return self.last_contraction();
        };
        let t = self.recursive_step(child_depth);
        self.zz.dot(&branch(&self.x, &t, self.degree - 1))
    }

    /// The expectation value of `observable ⊗ observable` on the root edge.
    pub fn expectation(&self, observable: Observable) -> Result<Complex64> {
        let energy = x_sandwich_weighted(self.params.beta(), observable)?;
        let t = self.recursive_step(self.params.layers() - 1);
        let y = branch(&energy, &t, self.degree - 1);
        Ok(y.dot(&self.zz.dot(&y)))
    }
}

/// The doubled accumulator of a leaf vertex of a 3-regular tree.
pub fn sandwich_last_contraction(params: &QaoaParams) -> Result<Array1<Complex64>> {
    Ok(SandwichContractor::new(params, DEFAULT_DEGREE)?.last_contraction())
}

/// The doubled accumulator of level `depth` of a 3-regular tree.
pub fn sandwich_recursive_step(depth: usize, params: &QaoaParams) -> Result<Array1<Complex64>> {
    Ok(SandwichContractor::new(params, DEFAULT_DEGREE)?.recursive_step(depth))
}

/// Same as [`crate::tree::recursion::tree_expectation`], computed with doubled
/// tensors.
pub fn sandwich_tree_expectation(params: &QaoaParams, observable: Observable) -> Result<Complex64> {
    SandwichContractor::new(params, DEFAULT_DEGREE)?.expectation(observable)
}
