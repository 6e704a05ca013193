//! Elimination order finders.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::contractionpath::EliminationOrder;

pub mod greedy;

/// An optimizer for finding an elimination order.
pub trait FindPath {
    /// Finds an elimination order.
    fn find_path(&mut self);

    /// Returns the best found elimination order.
    fn get_best_path(&self) -> &EliminationOrder;

    /// Returns the total op count of the best order found.
    fn get_best_flops(&self) -> f64;

    /// Returns the contraction width of the best order found, that is the largest
    /// number of legs of any intermediate tensor.
    fn get_best_width(&self) -> usize;
}

/// The greedy score used to pick the next leg to eliminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heuristic {
    /// Eliminate the leg whose elimination adds the fewest new connections.
    #[default]
    MinFill,
    /// Eliminate the leg with the fewest neighbours.
    MinDegree,
}

pub(crate) fn validate_order(order: &EliminationOrder) {
    let mut eliminated = FxHashSet::default();
    for leg in order.legs() {
        assert!(
            eliminated.insert(*leg),
            "Eliminating already eliminated leg: {leg:?}, order: {order:?}"
        );
    }
}
