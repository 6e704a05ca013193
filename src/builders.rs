pub mod bethe;
pub mod circuit_builder;
pub mod qaoa_circuit;
