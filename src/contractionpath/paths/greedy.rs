use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    contractionpath::{
        contraction_cost::bucket_elimination_cost, interaction_graph::InteractionGraph,
        EliminationOrder,
    },
    tensornetwork::tensor::{EdgeIndex, Tensor},
};

use super::{validate_order, FindPath, Heuristic};

/// Greedy elimination order search. In every step, the leg with the lowest
/// [`Heuristic`] score is summed out; ties are broken by degree and then by the
/// smaller leg index, so the result is deterministic.
///
/// Only closed legs, i.e. legs carried by at least two axes of the network, are
/// eliminated. Open legs remain on the result.
#[derive(Debug, Clone)]
pub struct Greedy {
    graph: InteractionGraph,
    tensors: Vec<Vec<EdgeIndex>>,
    dims: FxHashMap<EdgeIndex, usize>,
    closed_legs: BTreeSet<EdgeIndex>,
    heuristic: Heuristic,
    best_flops: f64,
    best_width: usize,
    best_path: EliminationOrder,
}

impl Greedy {
    pub fn new(tn: &Tensor, heuristic: Heuristic) -> Self {
        let tensors = tn.leaves().map(|t| t.legs().to_vec()).collect_vec();
        let mut dims = FxHashMap::default();
        for leaf in tn.leaves() {
            for (&leg, &dim) in leaf.legs().iter().zip(leaf.bond_dims()) {
                dims.entry(leg).or_insert(dim);
            }
        }
        let closed_legs = tensors
            .iter()
            .flatten()
            .copied()
            .counts()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(leg, _)| leg)
            .collect();
        Self {
            graph: InteractionGraph::new(tn),
            tensors,
            dims,
            closed_legs,
            heuristic,
            best_flops: f64::INFINITY,
            best_width: usize::MAX,
            best_path: EliminationOrder::default(),
        }
    }

    fn score(&self, graph: &InteractionGraph, leg: EdgeIndex) -> usize {
        match self.heuristic {
            Heuristic::MinFill => graph.fill_in(leg),
            Heuristic::MinDegree => graph.degree(leg),
        }
    }
}

impl FindPath for Greedy {
    fn find_path(&mut self) {
        let mut graph = self.graph.clone();
        let mut remaining = self.closed_legs.clone();
        let mut legs = Vec::with_capacity(remaining.len());
        loop {
            let Some(leg) = remaining
                .iter()
                .copied()
                .filter(|&leg| graph.contains(leg))
                .min_by_key(|&leg| (self.score(&graph, leg), graph.degree(leg), leg))
            else {
                break;
            };
            graph.eliminate(leg);
            remaining.remove(&leg);
            legs.push(leg);
        }

        let order = EliminationOrder::new(legs);
        validate_order(&order);
        let (flops, width) = bucket_elimination_cost(self.tensors.clone(), &self.dims, &order);
        debug!(heuristic:? = self.heuristic, flops, width; "Found elimination order");
        self.best_flops = flops;
        self.best_width = width;
        self.best_path = order;
    }

    fn get_best_path(&self) -> &EliminationOrder {
        &self.best_path
    }

    fn get_best_flops(&self) -> f64 {
        self.best_flops
    }

    fn get_best_width(&self) -> usize {
        self.best_width
    }
}
