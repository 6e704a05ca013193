//! Tensors of whole ZZ-phase and X-phase layers of a single vertex (or edge) of the
//! tree, stacked over all QAOA rounds.
//!
//! Axis labels follow the layer index. For a depth-`p` circuit, label `i < p` of a
//! ZZ tensor is the value of the qubit during round `i` on the ket side; the bra
//! side counts back down from `2p - 1`, so the middle separates the ket from the
//! bra. All contractions go through [`einsum`].

use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;

use crate::{
    error::{QaoaError, Result},
    gates::{load_gate, load_gate_adjoint, DataTensor},
    tensornetwork::{contraction::einsum, tensor::EdgeIndex},
    types::Observable,
};

pub(crate) fn check_layers(angles: &[f64]) -> Result<usize> {
    if angles.is_empty() {
        Err(QaoaError::EmptyAngles)
    } else {
        Ok(angles.len())
    }
}

/// Contracts a list of labelled tensors, keeping the labels in `output`.
fn contract(tensors: &[(Vec<EdgeIndex>, DataTensor)], output: &[EdgeIndex]) -> Result<DataTensor> {
    let operands = tensors
        .iter()
        .map(|(legs, data)| (legs.as_slice(), data))
        .collect_vec();
    einsum(&operands, output)
}

/// Outer product of the compressed ZZ gates with the given angles. Gate `i` carries
/// the labels `(i, n + i)`, and the result is reshaped to a `2^n x 2^n` matrix.
fn zz_outer(gates: Vec<DataTensor>) -> Result<Array2<Complex64>> {
    let n = gates.len();
    let tensors = gates
        .into_iter()
        .enumerate()
        .map(|(i, gate)| (vec![i, n + i], gate))
        .collect_vec();
    let output = (0..2 * n).collect_vec();
    let dim = 1 << n;
    Ok(contract(&tensors, &output)?.into_shape_with_order((dim, dim))?)
}

/// Column 0 of the Hadamard matrix, i.e., the |+> state.
pub fn hadamard_basis_vector() -> Result<Array1<Complex64>> {
    let h = load_gate("h", &[])?;
    Ok(h.index_axis(Axis(1), 0)
        .to_owned()
        .into_dimensionality()?)
}

/// The ZZ-phase gates of all rounds on one edge, `2^p x 2^p`.
///
/// Row bit `i` (most significant first) is the value of one endpoint in round
/// `i`, column bit `i` the value of the other endpoint. The matrix is symmetric.
///
/// # Examples
/// ```
/// # use bethe_qaoa::tree::layers::zz_layer;
/// let zz = zz_layer(&[0.3, -1.2]).unwrap();
/// assert_eq!(zz.dim(), (4, 4));
/// assert_eq!(zz, zz.t());
/// ```
pub fn zz_layer(gamma: &[f64]) -> Result<Array2<Complex64>> {
    check_layers(gamma)?;
    let gates = gamma
        .iter()
        .map(|g| load_gate("zz", &[2.0 * g]))
        .collect::<Result<Vec<_>>>()?;
    zz_outer(gates)
}

/// The ZZ-phase gates of all rounds on one edge together with their adjoints in
/// reverse order, `4^p x 4^p`. Row bits are the ket rounds `0..p` followed by the bra
/// rounds `p-1..=0` of one endpoint, columns the same for the other endpoint.
pub fn zz_sandwich(gamma: &[f64]) -> Result<Array2<Complex64>> {
    check_layers(gamma)?;
    let ket = gamma.iter().map(|g| load_gate("zz", &[2.0 * g]));
    let bra = gamma.iter().rev().map(|g| load_gate_adjoint("zz", &[2.0 * g]));
    let gates = ket.chain(bra).collect::<Result<Vec<_>>>()?;
    zz_outer(gates)
}

/// The X-phase gates of all rounds on one vertex applied to |+>.
///
/// Gate `i` maps label `i` to label `i + 1`, and the Hadamard basis vector sits on
/// label 0. The result has `p + 1` axes, the last being the final qubit value.
pub fn x_chain(beta: &[f64]) -> Result<DataTensor> {
    let p = check_layers(beta)?;
    let mut tensors = vec![(vec![0], hadamard_basis_vector()?.into_dyn())];
    for (i, b) in beta.iter().enumerate() {
        tensors.push((vec![i + 1, i], load_gate("xphase", &[2.0 * b])?));
    }
    contract(&tensors, &(0..=p).collect_vec())
}

/// The X-phase chain on the ket side and its adjoint on the bra side, joined at
/// the middle label `p`. Both ends carry the (conjugated) Hadamard basis vector.
/// The result has `2p + 1` axes and sums to 1.
pub fn x_sandwich(beta: &[f64]) -> Result<DataTensor> {
    let p = check_layers(beta)?;
    let h0 = hadamard_basis_vector()?;
    let mut tensors = vec![
        (vec![0], h0.clone().into_dyn()),
        (vec![2 * p], h0.mapv(|c| c.conj()).into_dyn()),
    ];
    for (i, b) in beta.iter().enumerate() {
        tensors.push((vec![i + 1, i], load_gate("xphase", &[2.0 * b])?));
        tensors.push((vec![2 * p - i, 2 * p - i - 1], load_gate_adjoint("xphase", &[2.0 * b])?));
    }
    contract(&tensors, &(0..=2 * p).collect_vec())
}

/// [`x_sandwich`] weighted by `observable` on the middle axis, with the middle axis
/// summed out and the remaining axes flattened to a vector of length `4^p`.
pub fn x_sandwich_weighted(beta: &[f64], observable: Observable) -> Result<Array1<Complex64>> {
    let p = check_layers(beta)?;
    let x = x_sandwich(beta)?;
    let weight = observable.to_tensor().into_dyn();
    let all_axes = (0..=2 * p).collect_vec();
    let output = all_axes.iter().copied().filter(|&l| l != p).collect_vec();
    let traced = einsum(&[(&all_axes, &x), (&[p], &weight)], &output)?;
    Ok(traced.into_shape_with_order(1 << (2 * p))?)
}

/// [`x_sandwich`] with the middle axis summed out, flattened to a vector of length
/// `4^p`.
#[inline]
pub fn x_sandwich_traced(beta: &[f64]) -> Result<Array1<Complex64>> {
    x_sandwich_weighted(beta, Observable::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::approx_eq;
    use ndarray::Array;

    fn assert_close(a: Complex64, b: Complex64) {
        assert!(approx_eq!(f64, a.re, b.re, epsilon = 1e-12), "{a} != {b}");
        assert!(approx_eq!(f64, a.im, b.im, epsilon = 1e-12), "{a} != {b}");
    }

    /// The vector with 1/2 on the all-zero and all-one entries.
    fn hadamard_corner(p: usize) -> Array1<Complex64> {
        let mut ones = Array1::zeros(1 << (2 * p));
        ones[0] = Complex64::new(0.5, 0.0);
        ones[(1 << (2 * p)) - 1] = Complex64::new(0.5, 0.0);
        ones
    }

    #[test]
    fn zz_layer_entries() {
        let gamma = [0.4, -0.9];
        let zz = zz_layer(&gamma).unwrap();
        // rows 0b01 and columns 0b00: round 0 equal, round 1 different
        let expected = Complex64::from_polar(1.0, -0.4) * Complex64::from_polar(1.0, -0.9);
        assert_close(zz[[1, 0]], expected);
        assert_close(zz[[3, 3]], Complex64::from_polar(1.0, 0.5));
        assert_eq!(zz, zz.t());
    }

    #[test]
    fn zz_sandwich_properties() {
        for gamma in [vec![0.0, 0.123], vec![1.3], vec![0.2, -0.7, 2.1]] {
            let p = gamma.len();
            let zz = zz_sandwich(&gamma).unwrap();
            assert_eq!(zz.len(), 16usize.pow(p as u32));
            assert_eq!(zz, zz.t());
            let n = zz.nrows();
            assert_close(zz[[0, 0]] + zz[[n - 1, n - 1]], Complex64::new(2.0, 0.0));

            let ones = hadamard_corner(p);
            assert_close(ones.dot(&zz.dot(&ones)), Complex64::ONE);
        }
    }

    #[test]
    fn x_sandwich_sums_to_one() {
        for beta in [vec![0.05, 0.0], vec![-0.3], vec![1.1, 0.4, -2.0]] {
            let x = x_sandwich(&beta).unwrap();
            assert_eq!(x.ndim(), 2 * beta.len() + 1);
            assert!(x.shape().iter().all(|&d| d == 2));
            assert_close(x.sum(), Complex64::ONE);
        }
    }

    #[test]
    fn x_sandwich_inner_axes() {
        // Summing all but the outermost axes leaves diag(h0 h0^T)
        let beta = [0.05, 0.0];
        let x = x_sandwich(&beta).unwrap();
        let xs = einsum(&[(&[0, 1, 2, 3, 4], &x)], &[0, 4]).unwrap();
        let h0 = hadamard_basis_vector().unwrap();
        let expected = Array::from_shape_fn((2, 2), |(i, j)| {
            if i == j {
                h0[i] * h0[j]
            } else {
                Complex64::ZERO
            }
        })
        .into_dyn();
        for (a, b) in xs.iter().zip(&expected) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn traced_without_mixing_is_hadamard_corner() {
        let x = x_sandwich_traced(&[0.0, 0.0]).unwrap();
        for (a, b) in x.iter().zip(&hadamard_corner(2)) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn x_chain_is_normalized_state() {
        let chain = x_chain(&[0.3, -1.4, 0.8]).unwrap();
        assert_eq!(chain.shape(), &[2, 2, 2, 2]);
        // the X-phase gates are unitary, so the final state keeps norm 1
        let final_state = einsum(&[(&[0, 1, 2, 3], &chain)], &[3]).unwrap();
        let norm: f64 = final_state.iter().map(|c| c.norm_sqr()).sum();
        assert!(approx_eq!(f64, norm, 1.0, epsilon = 1e-12));
    }

    #[test]
    fn generators_are_deterministic() {
        let gamma = [0.7, -0.1];
        let beta = [0.2, 1.9];
        assert_eq!(zz_layer(&gamma).unwrap(), zz_layer(&gamma).unwrap());
        assert_eq!(zz_sandwich(&gamma).unwrap(), zz_sandwich(&gamma).unwrap());
        assert_eq!(x_sandwich(&beta).unwrap(), x_sandwich(&beta).unwrap());
        assert_eq!(x_chain(&beta).unwrap(), x_chain(&beta).unwrap());
    }

    #[test]
    fn empty_angles() {
        assert!(matches!(zz_layer(&[]), Err(QaoaError::EmptyAngles)));
        assert!(matches!(zz_sandwich(&[]), Err(QaoaError::EmptyAngles)));
        assert!(matches!(x_chain(&[]), Err(QaoaError::EmptyAngles)));
        assert!(matches!(x_sandwich_traced(&[]), Err(QaoaError::EmptyAngles)));
    }
}
