//! Expectation values of QAOA circuits on the lightcone of an edge of a regular
//! tree (Bethe lattice).
//!
//! The main entry point is [`tree::recursion::tree_expectation`], which exploits
//! the self-similarity of the tree to contract the lightcone level by level. The
//! [`simulator`] contracts the same circuit as a generic tensor network by bucket
//! elimination and serves as a reference.

pub mod builders;
pub mod contractionpath;
pub mod error;
pub mod gates;
pub mod simulator;
pub mod tensornetwork;
pub mod tree;
pub mod types;
pub mod utils;
