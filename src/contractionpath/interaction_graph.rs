use rustc_hash::{FxHashMap, FxHashSet};

use crate::tensornetwork::tensor::{EdgeIndex, Tensor};

/// The line graph of a tensor network: legs are vertices, and two legs are
/// adjacent if some tensor carries both. Eliminating a leg connects all of its
/// neighbours, as the intermediate tensor carries all of them.
#[derive(Debug, Clone, Default)]
pub(crate) struct InteractionGraph {
    neighbors: FxHashMap<EdgeIndex, FxHashSet<EdgeIndex>>,
}

impl InteractionGraph {
    pub fn new(tn: &Tensor) -> Self {
        let mut graph = Self::default();
        for leaf in tn.leaves() {
            graph.add_clique(leaf.legs());
        }
        graph
    }

    fn add_clique(&mut self, legs: &[EdgeIndex]) {
        for &leg in legs {
            let entry = self.neighbors.entry(leg).or_default();
            entry.extend(legs.iter().copied().filter(|&other| other != leg));
        }
    }

    pub fn contains(&self, leg: EdgeIndex) -> bool {
        self.neighbors.contains_key(&leg)
    }

    pub fn degree(&self, leg: EdgeIndex) -> usize {
        self.neighbors[&leg].len()
    }

    /// The number of edges that eliminating `leg` would add between its neighbours.
    pub fn fill_in(&self, leg: EdgeIndex) -> usize {
        let neighbors = &self.neighbors[&leg];
        let mut missing = 0;
        for &u in neighbors {
            for &v in neighbors {
                if u < v && !self.neighbors[&u].contains(&v) {
                    missing += 1;
                }
            }
        }
        missing
    }

    /// Removes `leg` and connects all of its neighbours.
    pub fn eliminate(&mut self, leg: EdgeIndex) {
        let Some(neighbors) = self.neighbors.remove(&leg) else {
            return;
        };
        for &u in &neighbors {
            if let Some(entry) = self.neighbors.get_mut(&u) {
                entry.remove(&leg);
                entry.extend(neighbors.iter().copied().filter(|&v| v != u));
            }
        }
    }
}
