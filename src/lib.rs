//! # lattice-reduce
//!
//! The axis-reduction operator family of the Lattice tensor-graph engine:
//! `reduce_sum`, `reduce_mean`, `reduce_max`, and `reduce_min`, plus their
//! gradient operators. The four kinds share one shape-inference algorithm,
//! one gradient-shape algorithm, and one kernel-execution path; they differ
//! only in the stateless functor bound to each operator instance.
//!
//! The surrounding engine — graph executor, variable storage, the operator
//! registry proper — lives outside this crate and is reached through the
//! narrow contracts in [`registry`].

pub mod error;
pub mod ops;
pub mod registry;
pub mod tensor;

pub use error::ReduceError;
pub use ops::reduction::{ReduceAttrs, ReduceGradOp, ReduceKind, ReduceOp};
pub use registry::{register_reduce_ops, Device, KernelEntry, OpRegistry};
pub use tensor::{Lod, Tensor};

// Re-export for downstream trait bounds.
pub use num_traits;
