use float_cmp::{ApproxEq, F64Margin};

use crate::{
    error::{QaoaError, Result},
    gates::{is_gate_diagonal, load_gate, load_gate_adjoint, matrix_adjoint, DataTensor},
};

/// The data of a tensor.
#[derive(Default, Debug, Clone)]
pub enum TensorData {
    /// This is for composite tensors that have not been contracted yet, as well as
    /// empty tensors in general.
    #[default]
    Uncontracted,
    /// A quantum gate. The name must be registered in the gates module.
    Gate((String, Vec<f64>, bool)),
    /// A dense array of complex numbers.
    Matrix(DataTensor),
}

impl TensorData {
    /// Creates lazy tensor data referring to a registered gate.
    #[must_use]
    pub fn new_gate(name: &str, angles: &[f64]) -> Self {
        Self::Gate((name.to_owned(), angles.to_vec(), false))
    }

    /// Consumes the tensor data and returns the contained tensor.
    pub fn into_data(self) -> Result<DataTensor> {
        match self {
            TensorData::Uncontracted => Err(QaoaError::Uncontracted),
            TensorData::Gate((gatename, angles, adjoint)) => {
                if adjoint {
                    load_gate_adjoint(&gatename, &angles)
                } else {
                    load_gate(&gatename, &angles)
                }
            }
            TensorData::Matrix(tensor) => Ok(tensor),
        }
    }

    /// Returns the adjoint of this data.
    #[must_use]
    pub fn adjoint(self) -> Self {
        match self {
            TensorData::Uncontracted => TensorData::Uncontracted,
            TensorData::Gate((name, params, adjoint)) => TensorData::Gate((name, params, !adjoint)),
            TensorData::Matrix(tensor) => TensorData::Matrix(matrix_adjoint(tensor)),
        }
    }

    /// Whether this is a gate stored as its diagonal.
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        matches!(self, TensorData::Gate((name, _, _)) if is_gate_diagonal(name))
    }
}

impl ApproxEq for &TensorData {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        match (self, other) {
            (
                TensorData::Gate((name_l, angles_l, adjoint_l)),
                TensorData::Gate((name_r, angles_r, adjoint_r)),
            ) => {
                name_l == name_r
                    && adjoint_l == adjoint_r
                    && angles_l.len() == angles_r.len()
                    && angles_l
                        .iter()
                        .zip(angles_r)
                        .all(|(l, r)| l.approx_eq(*r, margin))
            }
            (TensorData::Matrix(l0), TensorData::Matrix(r0)) => {
                l0.shape() == r0.shape()
                    && l0.iter().zip(r0).all(|(l, r)| {
                        l.re.approx_eq(r.re, margin) && l.im.approx_eq(r.im, margin)
                    })
            }
            (TensorData::Uncontracted, TensorData::Uncontracted) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use ndarray::{arr0, arr2};
    use num_complex::Complex64;

    use super::*;

    #[test]
    #[should_panic(expected = "assertion failed: `(left approx_eq right)`")]
    fn gates_eq_different_name() {
        let g1 = TensorData::Gate((String::from("x"), vec![], false));
        let g2 = TensorData::Gate((String::from("X"), vec![], false));
        assert_approx_eq!(&TensorData, &g1, &g2);
    }

    #[test]
    #[should_panic(expected = "assertion failed: `(left approx_eq right)`")]
    fn gates_eq_adjoint() {
        let g1 = TensorData::Gate((String::from("h"), vec![], false));
        let g2 = TensorData::Gate((String::from("h"), vec![], true));
        assert_approx_eq!(&TensorData, &g1, &g2);
    }

    #[test]
    #[should_panic(expected = "assertion failed: `(left approx_eq right)`")]
    fn gates_eq_different_angles() {
        let g1 = TensorData::new_gate("zz", &[1.4]);
        let g2 = TensorData::new_gate("zz", &[-1.4]);
        assert_approx_eq!(&TensorData, &g1, &g2);
    }

    #[test]
    #[should_panic(expected = "assertion failed: `(left approx_eq right)`")]
    fn eq_different_data() {
        let g1 = TensorData::new_gate("xphase", &[1.4]);
        let g2 = TensorData::Matrix(arr0(Complex64::ONE).into_dyn());
        assert_approx_eq!(&TensorData, &g1, &g2);
    }

    #[test]
    fn adjoint_twice_is_identity() {
        let g = TensorData::new_gate("xphase", &[0.7]);
        assert_approx_eq!(&TensorData, &g.clone().adjoint().adjoint(), &g);

        let m = TensorData::Matrix(
            arr2(&[
                [Complex64::new(1.0, 1.0), Complex64::new(2.0, 0.0)],
                [Complex64::new(0.0, -3.0), Complex64::new(4.0, 0.5)],
            ])
            .into_dyn(),
        );
        let expected = TensorData::Matrix(
            arr2(&[
                [Complex64::new(1.0, -1.0), Complex64::new(0.0, 3.0)],
                [Complex64::new(2.0, 0.0), Complex64::new(4.0, -0.5)],
            ])
            .into_dyn(),
        );
        assert_approx_eq!(&TensorData, &m.adjoint(), &expected);
    }

    #[test]
    fn gate_data_is_loaded_lazily() {
        let zz = TensorData::new_gate("zz", &[0.5]);
        assert!(zz.is_diagonal());
        let loaded = zz.clone().into_data().unwrap();
        let adjoint = zz.adjoint().into_data().unwrap();
        assert_eq!(loaded.shape(), &[2, 2]);
        assert_eq!(loaded[[0, 1]], adjoint[[0, 1]].conj());
        assert!(!TensorData::new_gate("h", &[]).is_diagonal());
    }

    #[test]
    fn uncontracted_has_no_data() {
        assert!(matches!(
            TensorData::Uncontracted.into_data(),
            Err(QaoaError::Uncontracted)
        ));
    }
}
