//! Building a tensor network from a quantum circuit.

use std::marker::PhantomData;

use itertools::Itertools;
use num_complex::Complex64;
use rustc_hash::FxHashSet;

use crate::{
    tensornetwork::{
        tensor::{EdgeIndex, Tensor},
        tensordata::TensorData,
    },
    types::Observable,
};

/// A quantum register, i.e., an array of qubits. Quantum registers group qubits,
/// and a circuit can act on multiple registers.
#[derive(Debug)]
pub struct QuantumRegister<'a> {
    base: usize,
    size: usize,
    phantom: PhantomData<&'a Circuit>,
}

impl QuantumRegister<'_> {
    /// Returns the qubit at a given index.
    pub fn qubit(&self, index: usize) -> Qubit<'_> {
        assert!(
            index < self.size,
            "Qubit {index} out of range for register of size {}",
            self.size
        );
        Qubit {
            index: self.base + index,
            phantom: PhantomData,
        }
    }

    /// Returns an iterator over all qubits in this register.
    pub fn qubits(&self) -> impl Iterator<Item = Qubit<'_>> {
        (self.base..self.base + self.size).map(|i| Qubit {
            index: i,
            phantom: PhantomData,
        })
    }

    /// Returns the size of the register.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns whether this register is empty, i.e., doesn't contain any qubits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// A single qubit from a quantum register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qubit<'a> {
    index: usize,
    phantom: PhantomData<&'a Circuit>,
}

/// A quantum circuit builder that constructs a tensor network representing a quantum
/// circuit.
///
/// Gates that are not diagonal get new output legs on their qubits, and their
/// tensors carry the output legs first and then the input legs. Diagonal gates are
/// stored compressed and attach to the current legs of their qubits, so they don't
/// create new legs.
#[derive(Debug, Default)]
pub struct Circuit {
    /// The last open edges on each qubit.
    open_edges: Vec<EdgeIndex>,
    /// The next edge to be used.
    next_edge: usize,
    /// The tensors representing the circuit.
    tensors: Vec<Tensor>,
}

impl Circuit {
    /// The |0> state.
    fn ket0() -> TensorData {
        TensorData::Matrix(ndarray::arr1(&[Complex64::ONE, Complex64::ZERO]).into_dyn())
    }

    /// Creates a new edge id.
    fn new_edge(&mut self) -> usize {
        let edge = self.next_edge;
        self.next_edge += 1;
        edge
    }

    /// Returns the total number of qubits allocated in this circuit.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::builders::circuit_builder::Circuit;
    /// let mut circuit = Circuit::default();
    /// let q1 = circuit.allocate_register(2);
    /// let q2 = circuit.allocate_register(3);
    /// assert_eq!(circuit.num_qubits(), 5);
    /// ```
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.open_edges.len()
    }

    /// Returns the number of tensors, including the initial states.
    #[inline]
    pub fn num_tensors(&self) -> usize {
        self.tensors.len()
    }

    /// Allocates a new quantum register. The qubits are initialized in the |0>
    /// state.
    pub fn allocate_register<'a>(&mut self, size: usize) -> QuantumRegister<'a> {
        let previous_qubits = self.num_qubits();

        self.open_edges.reserve(size);
        self.tensors.reserve(size);
        for _ in 0..size {
            let edge = self.new_edge();
            self.open_edges.push(edge);
            let mut ket0 = Tensor::new_from_const(vec![edge], 2);
            ket0.set_tensor_data(Self::ket0());
            self.tensors.push(ket0);
        }

        QuantumRegister {
            base: previous_qubits,
            size,
            phantom: PhantomData,
        }
    }

    /// Appends a gate to the circuit on the specified qubits.
    pub fn append_gate(&mut self, gate: TensorData, indices: &[Qubit]) {
        assert!(
            indices.iter().map(|q| q.index).all_unique(),
            "Qubit arguments must be unique"
        );

        let old_edges = indices
            .iter()
            .map(|q| self.open_edges[q.index])
            .collect_vec();
        let edges = if gate.is_diagonal() {
            old_edges
        } else {
            // Outputs first, then inputs
            let new_edges = (0..indices.len()).map(|e| e + self.next_edge).collect_vec();
            self.next_edge += indices.len();
            for (q, next_edge) in indices.iter().zip(&new_edges) {
                self.open_edges[q.index] = *next_edge;
            }
            new_edges.into_iter().chain(old_edges).collect_vec()
        };

        let mut new_tensor = Tensor::new_from_const(edges, 2);
        new_tensor.set_tensor_data(gate);
        self.tensors.push(new_tensor);
    }

    /// Creates the adjoint tensor of a given tensor. For full gates, the input and
    /// output legs are swapped; diagonal gates and states keep their legs. Every leg
    /// not in `shared` is offset by `leg_offset`.
    fn tensor_adjoint(
        tensor: &Tensor,
        leg_offset: usize,
        shared: &FxHashSet<EdgeIndex>,
    ) -> Tensor {
        let half = if tensor.tensor_data().is_diagonal() {
            0
        } else {
            tensor.legs().len() / 2
        };
        let shift = |l: &EdgeIndex| if shared.contains(l) { *l } else { l + leg_offset };
        let legs = tensor.legs()[half..]
            .iter()
            .chain(&tensor.legs()[..half])
            .map(shift)
            .collect();
        let bond_dims = tensor.bond_dims()[half..]
            .iter()
            .chain(&tensor.bond_dims()[..half])
            .copied()
            .collect();

        let data = tensor.tensor_data().clone().adjoint();

        let mut adjoint = Tensor::new(legs, bond_dims);
        adjoint.set_tensor_data(data);
        adjoint
    }

    /// Converts the circuit to a tensor network that computes the expectation value
    /// of a product of diagonal single-qubit observables. Qubits without an
    /// observable are traced out.
    ///
    /// The network holds the circuit, the adjoint circuit on offset legs and one
    /// observable vector per observed qubit. The final legs of each qubit are shared
    /// between the circuit and its adjoint, so the resulting network is closed and
    /// contracts to a scalar.
    pub fn into_expectation_value_network(mut self, observables: &[(Qubit, Observable)]) -> Tensor {
        assert!(
            observables.iter().map(|(q, _)| q.index).all_unique(),
            "Observed qubits must be unique"
        );
        let offset = self.next_edge;
        let shared = self.open_edges.iter().copied().collect::<FxHashSet<_>>();
        self.tensors
            .reserve(self.tensors.len() + observables.len());

        // Add the mirrored tensor network
        let mut adjoint_tensors = self
            .tensors
            .iter()
            .map(|tensor| Self::tensor_adjoint(tensor, offset, &shared))
            .collect_vec();
        self.tensors.append(&mut adjoint_tensors);

        // Add the layer of observables
        for (qubit, observable) in observables {
            let mut t = Tensor::new_from_const(vec![self.open_edges[qubit.index]], 2);
            t.set_tensor_data(TensorData::Matrix(observable.to_tensor().into_dyn()));
            self.tensors.push(t);
        }

        Tensor::new_composite(self.tensors)
    }
}
