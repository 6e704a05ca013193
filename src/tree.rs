//! Recursive contraction of the QAOA lightcone on regular trees.
//!
//! [`layers`] builds the tensors of whole gate layers, [`units`] assembles them
//! into the per-level matrices, and [`recursion`] combines the levels into the
//! expectation value. [`sandwich`] does the same with doubled ket/bra tensors.

pub mod layers;
pub mod recursion;
pub mod sandwich;
pub mod units;
