//! Functionality to contract tensor networks.
use std::borrow::Cow;

use itertools::Itertools;
use log::debug;
use ndarray::IxDyn;
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::{
    contractionpath::EliminationOrder,
    error::{QaoaError, Result},
    gates::DataTensor,
    tensornetwork::{
        tensor::{EdgeIndex, Tensor},
        tensordata::TensorData,
    },
};

/// Contracts dense tensors whose axes are labelled with leg indices.
///
/// Every operand is given as its labels (one per axis) and its data. The result has
/// one axis per label in `output`, in that order. All other labels are summed over.
/// A label may appear on any number of operands and any number of times on one
/// operand; all axes sharing a label are indexed together.
///
/// Every combination of label values is visited once, so the cost is the product
/// of the extents of all distinct labels, output and summed alike. Callers should
/// keep the number of distinct labels small: a ZZ layer over `p` rounds has `2p`
/// labels and costs `2^(2p)`, the doubled ZZ sandwich has `4p` and costs `2^(4p)`.
///
/// # Examples
/// ```
/// # use bethe_qaoa::tensornetwork::contraction::einsum;
/// # use ndarray::{arr1, arr2};
/// # use num_complex::Complex64;
/// let c = |re| Complex64::new(re, 0.0);
/// let a = arr2(&[[c(1.0), c(2.0)], [c(3.0), c(4.0)]]).into_dyn();
/// let v = arr1(&[c(1.0), c(-1.0)]).into_dyn();
/// // matrix-vector product over leg 1
/// let av = einsum(&[(&[0, 1], &a), (&[1], &v)], &[0]).unwrap();
/// assert_eq!(av.into_raw_vec_and_offset().0, vec![c(-1.0), c(-1.0)]);
/// ```
pub fn einsum(operands: &[(&[EdgeIndex], &DataTensor)], output: &[EdgeIndex]) -> Result<DataTensor> {
    let mut dims = FxHashMap::default();
    for (legs, data) in operands {
        if legs.len() != data.ndim() {
            return Err(QaoaError::LegCountMismatch {
                axes: data.ndim(),
                legs: legs.len(),
            });
        }
        for (&leg, &dim) in legs.iter().zip(data.shape()) {
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
    assert!(output.iter().all_unique(), "Output legs must be unique");

    // Output labels first, so the output offset only depends on the leading axes
    let labels = output
        .iter()
        .copied()
        .chain(
            operands
                .iter()
                .flat_map(|(legs, _)| legs.iter().copied())
                .filter(|leg| !output.contains(leg))
                .unique(),
        )
        .collect_vec();
    let label_position: FxHashMap<_, _> = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();
    let extents = labels
        .iter()
        .map(|leg| {
            *dims
                .get(leg)
                .unwrap_or_else(|| panic!("Output leg {leg} does not appear in any operand"))
        })
        .collect_vec();

    let output_shape = &extents[..output.len()];
    let mut result = vec![Complex64::ZERO; output_shape.iter().product()];
    if extents.contains(&0) {
        return Ok(DataTensor::from_shape_vec(IxDyn(output_shape), result)?);
    }

    // Per label, the step each flat buffer takes when that label is incremented
    let mut strides = Vec::with_capacity(operands.len() + 1);
    let mut buffers = Vec::with_capacity(operands.len());
    for (legs, data) in operands {
        let mut label_strides = vec![0; labels.len()];
        for (axis, leg) in legs.iter().enumerate() {
            let row_major: usize = data.shape()[axis + 1..].iter().product();
            label_strides[label_position[leg]] += row_major;
        }
        strides.push(label_strides);
        buffers.push(match data.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(data.iter().copied().collect_vec()),
        });
    }
    let mut output_strides = vec![0; labels.len()];
    for i in 0..output.len() {
        output_strides[i] = output_shape[i + 1..].iter().product();
    }

    let mut index = vec![0; labels.len()];
    let mut offsets = vec![0; operands.len()];
    let mut output_offset = 0;
    'odometer: loop {
        result[output_offset] += offsets
            .iter()
            .zip(&buffers)
            .map(|(&offset, buffer)| buffer[offset])
            .product::<Complex64>();

        for axis in (0..labels.len()).rev() {
            index[axis] += 1;
            let wrapped = index[axis] == extents[axis];
            for (offset, stride) in offsets.iter_mut().zip(&strides) {
                if wrapped {
                    *offset -= stride[axis] * (extents[axis] - 1);
                } else {
                    *offset += stride[axis];
                }
            }
            if wrapped {
                output_offset -= output_strides[axis] * (extents[axis] - 1);
                index[axis] = 0;
            } else {
                output_offset += output_strides[axis];
                continue 'odometer;
            }
        }
        break;
    }

    Ok(DataTensor::from_shape_vec(IxDyn(output_shape), result)?)
}

/// Fully contracts `tn` by bucket elimination along `order`.
///
/// For each leg in the order, all tensors carrying the leg are multiplied and the
/// leg is summed out. Legs not in the order stay open; the tensors left at the end
/// are multiplied into the result, whose legs are all remaining open legs. Nested
/// composite tensors are flattened first.
///
/// # Examples
/// ```
/// # use bethe_qaoa::{
/// #   contractionpath::paths::{greedy::Greedy, FindPath, Heuristic},
/// #   tensornetwork::{contraction::contract_tensor_network, tensor::Tensor, tensordata::TensorData},
/// # };
/// let mut h = Tensor::new_from_const(vec![0, 1], 2);
/// h.set_tensor_data(TensorData::new_gate("h", &[]));
/// let mut z = Tensor::new_from_const(vec![0], 2);
/// z.set_tensor_data(TensorData::new_gate("z", &[]));
/// let tn = Tensor::new_composite(vec![h, z]);
///
/// let mut opt = Greedy::new(&tn, Heuristic::MinFill);
/// opt.find_path();
/// let result = contract_tensor_network(tn, opt.get_best_path()).unwrap();
/// assert_eq!(result.legs(), &[1]);
/// ```
pub fn contract_tensor_network(tn: Tensor, order: &EliminationOrder) -> Result<Tensor> {
    let dims = tn.edges()?;
    let mut pending = tn
        .into_leaves()
        .into_iter()
        .filter(|t| !t.is_empty() || !matches!(t.tensor_data(), TensorData::Uncontracted))
        .map(|t| {
            let Tensor {
                legs, tensordata, ..
            } = t;
            tensordata.into_data().map(|data| (legs, data))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(len = pending.len(); "Start contracting tensor network");

    for &leg in order.legs() {
        let (bucket, rest): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|(legs, _)| legs.contains(&leg));
        pending = rest;
        if bucket.is_empty() {
            debug!(leg; "Leg does not appear in the network");
            continue;
        }

        let output = bucket
            .iter()
            .flat_map(|(legs, _)| legs.iter().copied())
            .filter(|&l| l != leg)
            .unique()
            .collect_vec();
        let operands = bucket
            .iter()
            .map(|(legs, data)| (legs.as_slice(), data))
            .collect_vec();
        debug!(leg, tensors = bucket.len(), rank = output.len(); "Eliminating leg");
        let data = einsum(&operands, &output)?;
        pending.push((output, data));
    }

    let output = pending
        .iter()
        .flat_map(|(legs, _)| legs.iter().copied())
        .unique()
        .collect_vec();
    let operands = pending
        .iter()
        .map(|(legs, data)| (legs.as_slice(), data))
        .collect_vec();
    let data = einsum(&operands, &output)?;
    debug!(open_legs = output.len(); "Completed tensor network contraction");

    let bond_dims = output.iter().map(|leg| dims[leg]).collect();
    let mut result = Tensor::new(output, bond_dims);
    result.set_tensor_data(TensorData::Matrix(data));
    Ok(result)
}
