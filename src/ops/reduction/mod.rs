//! The axis-reduction operator family (sum, mean, max, min).
//!
//! All four operators share one shape-inference path ([`shape`]), one kernel
//! execution path ([`kernel`]), and one metadata table ([`maker`]); they
//! differ only in the functor ([`functor`]) bound at construction time.

pub mod functor;
pub mod kernel;
pub mod maker;
pub mod op;
pub mod shape;

pub use functor::{
    GradFunctor, MaxFunctor, MaxOrMinGradFunctor, MeanFunctor, MeanGradFunctor, MinFunctor,
    ReduceFunctor, SumFunctor, SumGradFunctor,
};
pub use maker::{AttrSchema, AttrValue, OpDescriptor, ReduceOpMeta, REDUCE_OP_TABLE};
pub use op::{ReduceAttrs, ReduceGradOp, ReduceKind, ReduceOp};
pub use shape::{infer_reduce_grad_shape, infer_reduce_shape, InferredShape, MAX_RANK};
