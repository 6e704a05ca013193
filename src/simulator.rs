//! Reference expectation values by contracting the full lightcone network.
//!
//! The QAOA circuit is built on the part of the graph that can influence the
//! measured edge, turned into an expectation value network and contracted by bucket
//! elimination along a greedy order. This works for any graph, not only trees, and
//! is used to validate the recursive contraction in [`crate::tree`].

use log::{debug, info};
use num_complex::Complex64;
use petgraph::graph::UnGraph;

use crate::{
    builders::{bethe::lightcone_subgraph, qaoa_circuit::qaoa_circuit},
    contractionpath::paths::{greedy::Greedy, FindPath, Heuristic},
    error::Result,
    tensornetwork::{contraction::contract_tensor_network, tensor::Tensor},
    types::{Observable, QaoaParams},
};

/// Builds the network for `<O_u O_v>` where `(u, v) = edge`, restricted to the
/// lightcone of the edge.
fn lightcone_network(
    graph: &UnGraph<(), ()>,
    params: &QaoaParams,
    edge: (usize, usize),
    observable: Observable,
) -> Result<Tensor> {
    let (lightcone, (u, v)) = lightcone_subgraph(graph, edge, params.layers())?;
    debug!(
        nodes = lightcone.node_count(),
        edges = lightcone.edge_count();
        "Extracted lightcone"
    );
    let (circuit, qreg) = qaoa_circuit(&lightcone, params);
    Ok(circuit.into_expectation_value_network(&[
        (qreg.qubit(u), observable),
        (qreg.qubit(v), observable),
    ]))
}

/// Computes the expectation value of `observable ⊗ observable` on the endpoints of
/// `edge` after the QAOA circuit with `params` ran on `graph`.
///
/// # Errors
/// Returns [`QaoaError::UnknownEdge`] if `edge` is not part of the graph.
///
/// # Examples
/// ```
/// # use bethe_qaoa::builders::bethe::bethe_graph;
/// # use bethe_qaoa::simulator::edge_expectation;
/// # use bethe_qaoa::types::{Observable, QaoaParams};
/// let graph = bethe_graph(0, 3).unwrap();
/// let (gamma, beta) = (0.3, 0.7);
/// let params = QaoaParams::new(vec![gamma], vec![beta]).unwrap();
/// let value = edge_expectation(&graph, &params, (0, 1), Observable::PAULI_Z).unwrap();
/// // a single edge at p = 1
/// let expected = (4.0 * beta).sin() * (2.0 * gamma).sin();
/// assert!((value.re - expected).abs() < 1e-12);
/// ```
///
/// [`QaoaError::UnknownEdge`]: crate::error::QaoaError::UnknownEdge
pub fn edge_expectation(
    graph: &UnGraph<(), ()>,
    params: &QaoaParams,
    edge: (usize, usize),
    observable: Observable,
) -> Result<Complex64> {
    let tn = lightcone_network(graph, params, edge, observable)?;
    let mut opt = Greedy::new(&tn, Heuristic::MinFill);
    opt.find_path();
    info!(
        width = opt.get_best_width(),
        flops = opt.get_best_flops();
        "Contracting lightcone network"
    );
    let result = contract_tensor_network(tn, opt.get_best_path())?;
    Ok(result.tensordata.into_data()?.sum())
}

/// Returns the op count and the contraction width of the lightcone network of
/// `edge` under the given elimination heuristic.
pub fn lightcone_cost(
    graph: &UnGraph<(), ()>,
    params: &QaoaParams,
    edge: (usize, usize),
    heuristic: Heuristic,
) -> Result<(f64, usize)> {
    let tn = lightcone_network(graph, params, edge, Observable::PAULI_Z)?;
    let mut opt = Greedy::new(&tn, heuristic);
    opt.find_path();
    Ok((opt.get_best_flops(), opt.get_best_width()))
}

/// Returns the contraction width of the lightcone network of `edge` with a
/// min-fill elimination order.
#[inline]
pub fn lightcone_width(
    graph: &UnGraph<(), ()>,
    params: &QaoaParams,
    edge: (usize, usize),
) -> Result<usize> {
    lightcone_cost(graph, params, edge, Heuristic::MinFill).map(|(_, width)| width)
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::approx_eq;

    use crate::{builders::bethe::bethe_graph, error::QaoaError};

    fn params(gamma: &[f64], beta: &[f64]) -> QaoaParams {
        QaoaParams::new(gamma.to_vec(), beta.to_vec()).unwrap()
    }

    #[test]
    fn identity_observable_is_norm() {
        let graph = bethe_graph(2, 3).unwrap();
        let value = edge_expectation(
            &graph,
            &params(&[0.4, -1.2], &[0.9, 0.1]),
            (0, 1),
            Observable::IDENTITY,
        )
        .unwrap();
        assert!(approx_eq!(f64, value.re, 1.0, epsilon = 1e-10));
        assert!(approx_eq!(f64, value.im, 0.0, epsilon = 1e-10));
    }

    #[test]
    fn zero_gamma_has_no_correlation() {
        let graph = bethe_graph(1, 3).unwrap();
        let value =
            edge_expectation(&graph, &params(&[0.0], &[0.8]), (0, 1), Observable::PAULI_Z)
                .unwrap();
        assert!(approx_eq!(f64, value.re, 0.0, epsilon = 1e-12));
    }

    #[test]
    fn single_edge_closed_form() {
        let graph = bethe_graph(0, 2).unwrap();
        for (gamma, beta) in [(0.3, 0.7), (-1.1, 0.25), (2.5, -0.4)] {
            let value = edge_expectation(
                &graph,
                &params(&[gamma], &[beta]),
                (0, 1),
                Observable::PAULI_Z,
            )
            .unwrap();
            let expected = (4.0 * beta).sin() * (2.0 * gamma).sin();
            assert!(approx_eq!(f64, value.re, expected, epsilon = 1e-12));
            assert!(approx_eq!(f64, value.im, 0.0, epsilon = 1e-12));
        }
    }

    #[test]
    fn edge_direction_does_not_matter() {
        let graph = bethe_graph(2, 3).unwrap();
        let p = params(&[0.2], &[-0.6]);
        let forward = edge_expectation(&graph, &p, (0, 2), Observable::PAULI_Z).unwrap();
        let backward = edge_expectation(&graph, &p, (2, 0), Observable::PAULI_Z).unwrap();
        assert!(approx_eq!(f64, forward.re, backward.re, epsilon = 1e-12));
    }

    #[test]
    fn unknown_edge() {
        let graph = bethe_graph(1, 3).unwrap();
        assert!(matches!(
            edge_expectation(&graph, &params(&[0.1], &[0.1]), (2, 3), Observable::PAULI_Z),
            Err(QaoaError::UnknownEdge(2, 3))
        ));
    }

    #[test]
    fn width_grows_with_layers() {
        let graph = bethe_graph(3, 3).unwrap();
        let w1 = lightcone_width(&graph, &params(&[0.1], &[0.2]), (0, 1)).unwrap();
        let w3 = lightcone_width(&graph, &params(&[0.1; 3], &[0.2; 3]), (0, 1)).unwrap();
        assert!(w1 >= 2);
        assert!(w3 > w1);
        let (flops, width) =
            lightcone_cost(&graph, &params(&[0.1], &[0.2]), (0, 1), Heuristic::MinDegree)
                .unwrap();
        assert!(flops > 0.0);
        assert!(width >= 2);
    }
}
