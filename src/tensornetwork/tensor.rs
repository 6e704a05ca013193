//! Leaf and composite tensors of a tensor network.

use float_cmp::{ApproxEq, F64Margin};
use rustc_hash::FxHashMap;

use crate::{
    error::{QaoaError, Result},
    tensornetwork::tensordata::TensorData,
};

/// Index of a leg (edge) of the network. Legs with the same index are summed over
/// when the tensors carrying them are contracted.
pub type EdgeIndex = usize;

/// A tensor in a tensor network.
///
/// A leaf tensor has legs, one bond dimension per leg and (possibly lazy) data. A
/// composite tensor holds child tensors and represents their product; its own legs
/// are empty.
#[derive(Default, Debug, Clone)]
pub struct Tensor {
    pub(crate) tensors: Vec<Tensor>,
    pub(crate) legs: Vec<EdgeIndex>,
    pub(crate) bond_dims: Vec<usize>,
    pub(crate) tensordata: TensorData,
}

impl Tensor {
    /// Constructs a leaf tensor with the given legs and bond dimensions and without
    /// data.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::tensornetwork::tensor::Tensor;
    /// let tensor = Tensor::new(vec![2, 4, 5], vec![2, 2, 3]);
    /// assert_eq!(tensor.legs(), &[2, 4, 5]);
    /// assert_eq!(tensor.bond_dims(), &[2, 2, 3]);
    /// ```
    #[must_use]
    pub fn new(legs: Vec<EdgeIndex>, bond_dims: Vec<usize>) -> Self {
        assert_eq!(
            legs.len(),
            bond_dims.len(),
            "Every leg needs exactly one bond dimension"
        );
        Self {
            legs,
            bond_dims,
            ..Default::default()
        }
    }

    /// Constructs a leaf tensor whose legs all have the bond dimension `dim`.
    #[must_use]
    pub fn new_from_const(legs: Vec<EdgeIndex>, dim: usize) -> Self {
        let bond_dims = vec![dim; legs.len()];
        Self::new(legs, bond_dims)
    }

    /// Constructs a composite tensor holding the given tensors.
    #[must_use]
    pub fn new_composite(tensors: Vec<Tensor>) -> Self {
        Self {
            tensors,
            ..Default::default()
        }
    }

    /// The legs of this tensor.
    #[inline]
    pub fn legs(&self) -> &[EdgeIndex] {
        &self.legs
    }

    /// The bond dimension of each leg, in the order of [`Tensor::legs`].
    #[inline]
    pub fn bond_dims(&self) -> &[usize] {
        &self.bond_dims
    }

    /// Returns whether this tensor is a leaf, i.e. it has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Returns whether the tensor has neither children nor legs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty() && self.legs.is_empty()
    }

    /// The data of this tensor.
    #[inline]
    pub fn tensor_data(&self) -> &TensorData {
        &self.tensordata
    }

    /// Replaces the data of this tensor.
    pub fn set_tensor_data(&mut self, tensordata: TensorData) {
        assert!(self.is_leaf(), "Cannot set data of a composite tensor");
        self.tensordata = tensordata;
    }

    /// Iterates over all leaf tensors, descending into nested composites.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &Tensor> + '_> {
        if self.is_leaf() {
            Box::new(std::iter::once(self))
        } else {
            Box::new(self.tensors.iter().flat_map(Tensor::leaves))
        }
    }

    /// Consumes the tensor and returns all its leaf tensors.
    pub fn into_leaves(self) -> Vec<Tensor> {
        if self.is_leaf() {
            vec![self]
        } else {
            self.tensors
                .into_iter()
                .flat_map(Tensor::into_leaves)
                .collect()
        }
    }

    /// Collects the bond dimension of every leg in the network.
    ///
    /// # Errors
    /// Returns [`QaoaError::BondDimensionMismatch`] if a leg is used with two
    /// different bond dimensions.
    pub fn edges(&self) -> Result<FxHashMap<EdgeIndex, usize>> {
        let mut dims = FxHashMap::default();
        for leaf in self.leaves() {
            for (&leg, &dim) in leaf.legs.iter().zip(&leaf.bond_dims) {
                let known = *dims.entry(leg).or_insert(dim);
                if known != dim {
                    return Err(QaoaError::BondDimensionMismatch {
                        leg,
                        left: known,
                        right: dim,
                    });
                }
            }
        }
        Ok(dims)
    }
}

impl ApproxEq for &Tensor {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.legs == other.legs
            && self.bond_dims == other.bond_dims
            && self.tensors.len() == other.tensors.len()
            && self
                .tensors
                .iter()
                .zip(&other.tensors)
                .all(|(l, r)| l.approx_eq(r, margin))
            && self.tensordata.approx_eq(&other.tensordata, margin)
    }
}
