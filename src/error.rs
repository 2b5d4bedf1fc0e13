//! Error types for the network.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T, E = NetworkError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector's length does not match the width a layer expects.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid topology {inputs}-{hidden}-{outputs}: every layer needs at least one input and one node")]
    InvalidTopology {
        inputs: usize,
        hidden: usize,
        outputs: usize,
    },

    /// `train` needs the activations left behind by an `activate` on the same input.
    #[error("train called without a preceding activate")]
    NotActivated,

    #[error("{0} cannot be represented in the network's float type")]
    Unrepresentable(usize),

    #[error("empty vector")]
    EmptyVector,

    /// A persisted record that cannot be turned into a complete network.
    #[error("malformed network state: {0}")]
    MalformedState(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
