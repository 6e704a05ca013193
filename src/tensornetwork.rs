//! Labelled tensors and their contraction.

pub mod contraction;
pub mod tensor;
pub mod tensordata;
