//! Error type shared by the recursive contractor and the reference simulator.

use thiserror::Error;

use crate::tensornetwork::tensor::EdgeIndex;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QaoaError>;

/// Everything that can go wrong while building or contracting the lightcone.
#[derive(Error, Debug)]
pub enum QaoaError {
    /// QAOA needs at least one layer.
    #[error("angle sequences must contain at least one layer")]
    EmptyAngles,

    /// `gamma` and `beta` describe a different number of layers.
    #[error("gamma has {gamma} angles but beta has {beta}")]
    AngleLengthMismatch { gamma: usize, beta: usize },

    /// An angle is NaN or infinite.
    #[error("angle {0} is not a finite number")]
    NonFiniteAngle(f64),

    /// The observable does not act on a single qubit.
    #[error("observable must have {expected} entries, got {actual}")]
    ObservableDimension { expected: usize, actual: usize },

    /// Regular trees need every inner vertex to have at least two neighbours.
    #[error("branching degree must be at least 2, got {0}")]
    InvalidDegree(usize),

    /// The requested edge is not part of the graph.
    #[error("edge ({0}, {1}) is not part of the graph")]
    UnknownEdge(usize, usize),

    /// No gate with this name is registered.
    #[error("gate '{0}' not found")]
    UnknownGate(String),

    /// A gate was called with the wrong number of angles.
    #[error("gate '{gate}' expects {expected} angles, got {actual}")]
    GateArity {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// The same leg label is used with two different sizes.
    #[error("leg {leg} has mismatching bond dimensions {left} and {right}")]
    BondDimensionMismatch {
        leg: EdgeIndex,
        left: usize,
        right: usize,
    },

    /// A tensor has as many labels as it has axes, or else it can't be contracted.
    #[error("tensor has {axes} axes but {legs} legs")]
    LegCountMismatch { axes: usize, legs: usize },

    /// Data was requested from a tensor that has not been contracted yet.
    #[error("cannot convert uncontracted tensor to data")]
    Uncontracted,

    /// Reshaping a dense array failed.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
