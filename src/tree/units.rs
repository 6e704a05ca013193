//! Per-level building blocks of the recursion.
//!
//! All unit matrices share one layout: rows are the ket values `z^0..z^{p-1}` of a
//! vertex (round 0 most significant), columns its bra values `w^{p-1}..w^0`.

use itertools::Itertools;
use ndarray::Array2;
use num_complex::Complex64;

use crate::{
    error::Result,
    tensornetwork::contraction::einsum,
    tree::layers::{check_layers, x_chain, zz_layer},
    types::Observable,
};

/// The ZZ-phase layers of one edge, split into the ket part (`forward`) and the bra
/// part (`backward`, built from the negated angles in reverse order).
#[derive(Debug, Clone, PartialEq)]
pub struct ZzUnit {
    pub forward: Array2<Complex64>,
    pub backward: Array2<Complex64>,
}

impl ZzUnit {
    pub fn new(gamma: &[f64]) -> Result<Self> {
        let reversed = gamma.iter().rev().map(|g| -g).collect_vec();
        Ok(Self {
            forward: zz_layer(gamma)?,
            backward: zz_layer(&reversed)?,
        })
    }

    /// Pushes the ket and bra values of a child vertex through the edge to its
    /// parent: `forward . y . backward^T`.
    pub fn propagate(&self, y: &Array2<Complex64>) -> Array2<Complex64> {
        self.forward.dot(&y.dot(&self.backward.t()))
    }
}

/// The ZZ unit for the angles `gamma`.
#[inline]
pub fn zz_unit(gamma: &[f64]) -> Result<ZzUnit> {
    ZzUnit::new(gamma)
}

/// Joins the X-phase chain of a vertex with the chain of the negated angles, with
/// `observable` on the final qubit value.
///
/// Since the Hadamard matrix is real and X-phase with the negated angle is the
/// complex conjugate, the second chain is the conjugate of the first.
fn x_pair(beta: &[f64], observable: Observable) -> Result<Array2<Complex64>> {
    let p = check_layers(beta)?;
    let ket = x_chain(beta)?;
    let negated = beta.iter().map(|b| -b).collect_vec();
    let bra = x_chain(&negated)?;
    let weight = observable.to_tensor().into_dyn();

    let ket_legs = (0..=p).collect_vec();
    let bra_legs = (p..=2 * p).rev().collect_vec();
    let output = (0..p).chain(p + 1..=2 * p).collect_vec();
    let unit = einsum(
        &[
            (ket_legs.as_slice(), &ket),
            (bra_legs.as_slice(), &bra),
            (&[p], &weight),
        ],
        &output,
    )?;
    let dim = 1 << p;
    Ok(unit.into_shape_with_order((dim, dim))?)
}

/// The X unit: the mixer chains of one vertex on ket and bra side, with the final
/// value traced out.
///
/// # Examples
/// ```
/// # use bethe_qaoa::tree::units::x_unit;
/// let x = x_unit(&[0.2, -0.5]).unwrap();
/// assert_eq!(x.dim(), (4, 4));
/// // the trace over the final value of a normalized state
/// assert!((x.sum().re - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn x_unit(beta: &[f64]) -> Result<Array2<Complex64>> {
    x_pair(beta, Observable::IDENTITY)
}

/// The X unit weighted by `observable` on the final value, used for the vertices
/// of the measured edge.
#[inline]
pub fn x_energy(beta: &[f64], observable: Observable) -> Result<Array2<Complex64>> {
    x_pair(beta, observable)
}
