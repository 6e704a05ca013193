//! Bethe lattices, i.e., regular trees grown around a root edge.

use petgraph::{
    algo::dijkstra,
    graph::{NodeIndex, UnGraph},
};
use rustc_hash::FxHashMap;

use crate::error::{QaoaError, Result};

/// Builds a regular tree of the given `depth` around the root edge (0, 1).
///
/// Starting from the root edge, every round attaches `degree - 1` children to each
/// leaf, so after the last round all inner vertices have `degree` neighbours.
/// Nodes are numbered in the order they are created, which is breadth first. A
/// depth of 0 is the bare root edge.
///
/// # Errors
/// Returns [`QaoaError::InvalidDegree`] if `degree < 2`.
///
/// # Examples
/// ```
/// # use bethe_qaoa::builders::bethe::bethe_graph;
/// let graph = bethe_graph(2, 3).unwrap();
/// // 2 * (1 + 2 + 4) nodes
/// assert_eq!(graph.node_count(), 14);
/// assert_eq!(graph.edge_count(), 13);
/// ```
pub fn bethe_graph(depth: usize, degree: usize) -> Result<UnGraph<(), ()>> {
    if degree < 2 {
        return Err(QaoaError::InvalidDegree(degree));
    }

    let mut graph = UnGraph::default();
    let a = graph.add_node(());
    let b = graph.add_node(());
    graph.add_edge(a, b, ());

    let mut leaves = vec![a, b];
    for _ in 0..depth {
        let mut next_leaves = Vec::with_capacity(leaves.len() * (degree - 1));
        for leaf in leaves {
            for _ in 1..degree {
                let child = graph.add_node(());
                graph.add_edge(leaf, child, ());
                next_leaves.push(child);
            }
        }
        leaves = next_leaves;
    }
    Ok(graph)
}

/// Extracts the part of `graph` that can influence an observable on `edge` after
/// `radius` QAOA layers.
///
/// The subgraph contains all nodes within distance `radius` of the edge and all
/// edges with at least one endpoint closer than `radius`. Returns the subgraph and
/// the new indices of the two endpoints of `edge`.
///
/// # Errors
/// Returns [`QaoaError::UnknownEdge`] if `edge` is not part of `graph`.
pub fn lightcone_subgraph(
    graph: &UnGraph<(), ()>,
    edge: (usize, usize),
    radius: usize,
) -> Result<(UnGraph<(), ()>, (usize, usize))> {
    let (u, v) = (NodeIndex::new(edge.0), NodeIndex::new(edge.1));
    if graph.find_edge(u, v).is_none() {
        return Err(QaoaError::UnknownEdge(edge.0, edge.1));
    }

    let from_u = dijkstra(graph, u, None, |_| 1usize);
    let from_v = dijkstra(graph, v, None, |_| 1usize);
    let distance = |node: NodeIndex| match (from_u.get(&node), from_v.get(&node)) {
        (Some(a), Some(b)) => Some(*a.min(b)),
        (a, b) => a.or(b).copied(),
    };

    let mut subgraph = UnGraph::default();
    let mut new_index = FxHashMap::default();
    for node in graph.node_indices() {
        if distance(node).is_some_and(|d| d <= radius) {
            new_index.insert(node, subgraph.add_node(()));
        }
    }
    for edge in graph.edge_indices() {
        let Some((a, b)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let (Some(&na), Some(&nb)) = (new_index.get(&a), new_index.get(&b)) else {
            continue;
        };
        let closest = distance(a).min(distance(b));
        if closest.is_some_and(|d| d < radius) || (a, b) == (u, v) || (a, b) == (v, u) {
            subgraph.add_edge(na, nb, ());
        }
    }
    Ok((
        subgraph,
        (new_index[&u].index(), new_index[&v].index()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_count(depth: u32, degree: usize) -> usize {
        2 * (0..=depth).map(|y| (degree - 1).pow(y)).sum::<usize>()
    }

    #[test]
    fn bethe_node_counts() {
        for degree in 2..=4 {
            for depth in 0..=3 {
                let graph = bethe_graph(depth as usize, degree).unwrap();
                assert_eq!(graph.node_count(), node_count(depth, degree));
                assert_eq!(graph.edge_count(), graph.node_count() - 1);
            }
        }
    }

    #[test]
    fn inner_nodes_are_regular() {
        let graph = bethe_graph(3, 3).unwrap();
        for node in graph.node_indices() {
            let neighbors = graph.neighbors(node).count();
            assert!(neighbors == 3 || neighbors == 1, "node {node:?}");
        }
        // the leaves are the last 16 nodes
        let leaves = graph
            .node_indices()
            .filter(|&n| graph.neighbors(n).count() == 1)
            .map(NodeIndex::index)
            .collect::<Vec<_>>();
        assert_eq!(leaves, (14..30).collect::<Vec<_>>());
    }

    #[test]
    fn invalid_degree() {
        assert!(matches!(bethe_graph(2, 1), Err(QaoaError::InvalidDegree(1))));
    }

    #[test]
    fn lightcone_of_deeper_tree() {
        let graph = bethe_graph(4, 3).unwrap();
        let (lightcone, (u, v)) = lightcone_subgraph(&graph, (0, 1), 2).unwrap();
        assert_eq!(lightcone.node_count(), bethe_graph(2, 3).unwrap().node_count());
        assert_eq!(lightcone.edge_count(), lightcone.node_count() - 1);
        assert_eq!((u, v), (0, 1));
    }

    #[test]
    fn lightcone_of_non_root_edge() {
        // the path 4 - 2 - 0 - 1 - 3 - 5
        let graph = bethe_graph(2, 2).unwrap();
        let (lightcone, (u, v)) = lightcone_subgraph(&graph, (1, 3), 1).unwrap();
        assert_eq!(lightcone.node_count(), 4);
        assert_eq!(lightcone.edge_count(), 3);
        assert!(lightcone
            .find_edge(NodeIndex::new(u), NodeIndex::new(v))
            .is_some());
    }

    #[test]
    fn lightcone_of_unknown_edge() {
        let graph = bethe_graph(1, 3).unwrap();
        assert!(matches!(
            lightcone_subgraph(&graph, (0, 5), 1),
            Err(QaoaError::UnknownEdge(0, 5))
        ));
    }
}
