use thiserror::Error;

/// Error type for the reduction operator family.
///
/// All variants are graph-construction or binding errors: they are raised
/// synchronously, never recovered internally, and propagated to the caller
/// that is building or running the graph.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq + Clone for easier testing
pub enum ReduceError {
    #[error("Missing required variable '{name}' for operation {operation}")]
    MissingVariable { name: String, operation: String },

    #[error("Tensors with rank at most 6 are supported, got rank {rank}")]
    RankTooHigh { rank: usize },

    #[error(
        "The dim should be in the range [-rank(input), rank(input)): got dim {dim} for rank {rank}"
    )]
    InvalidAxis { dim: i64, rank: usize },

    #[error("Tensor creation error: data length {data_len} does not match dims {dims:?}")]
    LengthMismatch { data_len: usize, dims: Vec<usize> },
}
