//! QAOA circuits on arbitrary interaction graphs.

use petgraph::{graph::UnGraph, visit::EdgeRef};

use crate::{
    builders::circuit_builder::{Circuit, QuantumRegister},
    tensornetwork::tensordata::TensorData,
    types::QaoaParams,
};

/// Creates the QAOA circuit for MaxCut on `graph`.
///
/// Every node is a qubit. After a layer of Hadamards, each round `k` applies
/// ZZ-phase(2 gamma_k) on every edge and then X-phase(2 beta_k) on every qubit.
/// Returns the circuit together with the register holding one qubit per node.
///
/// # Examples
/// ```
/// # use bethe_qaoa::builders::{bethe::bethe_graph, qaoa_circuit::qaoa_circuit};
/// # use bethe_qaoa::types::QaoaParams;
/// let graph = bethe_graph(1, 3).unwrap();
/// let params = QaoaParams::new(vec![0.4], vec![-0.2]).unwrap();
/// let (circuit, qreg) = qaoa_circuit(&graph, &params);
/// assert_eq!(qreg.len(), 6);
/// // initial states, hadamards, zz gates and mixers
/// assert_eq!(circuit.num_tensors(), 6 + 6 + 5 + 6);
/// ```
pub fn qaoa_circuit<'a>(
    graph: &UnGraph<(), ()>,
    params: &QaoaParams,
) -> (Circuit, QuantumRegister<'a>) {
    let mut circuit = Circuit::default();
    let qreg = circuit.allocate_register(graph.node_count());

    for q in qreg.qubits() {
        circuit.append_gate(TensorData::new_gate("h", &[]), &[q]);
    }

    for (gamma, beta) in params.gamma().iter().zip(params.beta()) {
        for edge in graph.edge_references() {
            circuit.append_gate(
                TensorData::new_gate("zz", &[2.0 * gamma]),
                &[
                    qreg.qubit(edge.source().index()),
                    qreg.qubit(edge.target().index()),
                ],
            );
        }
        for q in qreg.qubits() {
            circuit.append_gate(TensorData::new_gate("xphase", &[2.0 * beta]), &[q]);
        }
    }
    (circuit, qreg)
}
