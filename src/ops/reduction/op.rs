//! The reduction operators: binding checks, shape inference, LoD
//! propagation, and kernel dispatch.
//!
//! A [`ReduceOp`] (or [`ReduceGradOp`]) is constructed once per graph node
//! with its attributes fixed and its functor selected; invoking it is then
//! side-effect-local. Input and output arguments arrive as `Option`s because
//! the surrounding engine resolves variable names against its storage and a
//! binding may simply be absent; a required binding that is absent is a
//! [`ReduceError::MissingVariable`].

use std::sync::Arc;

use log::trace;
use num_traits::Float;

use super::functor::{
    GradFunctor, MaxFunctor, MaxOrMinGradFunctor, MeanFunctor, MeanGradFunctor, MinFunctor,
    ReduceFunctor, SumFunctor, SumGradFunctor,
};
use super::kernel::{ReduceGradKernel, ReduceKernel};
use super::maker;
use super::shape::{infer_reduce_grad_shape, infer_reduce_shape, normalize_axis, InferredShape};
use crate::error::ReduceError;
use crate::registry::grad_var_name;
use crate::tensor::Tensor;

/// The reduction rule an operator instance is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceKind {
    Sum,
    Mean,
    Max,
    Min,
}

/// Selects the forward functor for `kind`.
pub fn forward_functor<T: Float + 'static>(kind: ReduceKind) -> Arc<dyn ReduceFunctor<T>> {
    match kind {
        ReduceKind::Sum => Arc::new(SumFunctor),
        ReduceKind::Mean => Arc::new(MeanFunctor),
        ReduceKind::Max => Arc::new(MaxFunctor),
        ReduceKind::Min => Arc::new(MinFunctor),
    }
}

/// Selects the gradient functor for `kind`. Max and min share one functor:
/// both gradients flow only to the positions that produced the extremum.
pub fn grad_functor<T: Float + 'static>(kind: ReduceKind) -> Arc<dyn GradFunctor<T>> {
    match kind {
        ReduceKind::Sum => Arc::new(SumGradFunctor),
        ReduceKind::Mean => Arc::new(MeanGradFunctor),
        ReduceKind::Max | ReduceKind::Min => Arc::new(MaxOrMinGradFunctor),
    }
}

/// The `dim` / `keep_dim` attribute pair, immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceAttrs {
    dim: i64,
    keep_dim: bool,
}

impl ReduceAttrs {
    pub fn new(dim: i64, keep_dim: bool) -> Self {
        ReduceAttrs { dim, keep_dim }
    }

    pub fn dim(&self) -> i64 {
        self.dim
    }

    pub fn keep_dim(&self) -> bool {
        self.keep_dim
    }
}

impl Default for ReduceAttrs {
    fn default() -> Self {
        ReduceAttrs {
            dim: 0,
            keep_dim: false,
        }
    }
}

fn required<'a, T>(
    var: Option<&'a Tensor<T>>,
    name: &str,
    operation: &str,
) -> Result<&'a Tensor<T>, ReduceError> {
    var.ok_or_else(|| ReduceError::MissingVariable {
        name: name.to_string(),
        operation: operation.to_string(),
    })
}

/// A forward reduction operator: one kind, one attribute set, one functor.
pub struct ReduceOp<T> {
    kind: ReduceKind,
    attrs: ReduceAttrs,
    functor: Arc<dyn ReduceFunctor<T>>,
}

impl<T: Float + Default + 'static> ReduceOp<T> {
    pub fn new(kind: ReduceKind, attrs: ReduceAttrs) -> Self {
        ReduceOp {
            kind,
            attrs,
            functor: forward_functor(kind),
        }
    }

    pub fn kind(&self) -> ReduceKind {
        self.kind
    }

    pub fn attrs(&self) -> &ReduceAttrs {
        &self.attrs
    }

    fn name(&self) -> &'static str {
        maker::meta(self.kind).name
    }

    /// Graph-construction entry point: validates bindings and computes the
    /// output shape without touching any tensor data.
    pub fn infer_shape(
        &self,
        x: Option<&Tensor<T>>,
        out_bound: bool,
    ) -> Result<InferredShape, ReduceError> {
        let x = required(x, "X", self.name())?;
        if !out_bound {
            return Err(ReduceError::MissingVariable {
                name: "Out".to_string(),
                operation: self.name().to_string(),
            });
        }
        infer_reduce_shape(x.dims(), self.attrs.dim, self.attrs.keep_dim)
    }

    /// Execution entry point: re-infers the shape, resizes `out`, runs the
    /// kernel, and attaches or clears the sequence-length metadata.
    ///
    /// Validation happens before the kernel resizes anything, so a failed
    /// invocation leaves `out` exactly as it was.
    pub fn run(
        &self,
        x: Option<&Tensor<T>>,
        out: Option<&mut Tensor<T>>,
    ) -> Result<(), ReduceError> {
        let x = required(x, "X", self.name())?;
        let out = match out {
            Some(out) => out,
            None => {
                return Err(ReduceError::MissingVariable {
                    name: "Out".to_string(),
                    operation: self.name().to_string(),
                })
            }
        };
        let inferred = infer_reduce_shape(x.dims(), self.attrs.dim, self.attrs.keep_dim)?;
        trace!(
            "{}: reducing {:?} along axis {} -> {:?}",
            self.name(),
            x.dims(),
            inferred.axis,
            inferred.out_dims
        );

        ReduceKernel::new(self.functor.as_ref()).run(x, out, &inferred)?;

        // Only pass LoD when not reducing on the first dim.
        if inferred.propagate_lod {
            out.set_lod(x.lod().cloned());
        } else {
            out.set_lod(None);
        }
        Ok(())
    }
}

/// The backward counterpart of [`ReduceOp`].
pub struct ReduceGradOp<T> {
    kind: ReduceKind,
    attrs: ReduceAttrs,
    functor: Arc<dyn GradFunctor<T>>,
}

impl<T: Float + Default + 'static> ReduceGradOp<T> {
    pub fn new(kind: ReduceKind, attrs: ReduceAttrs) -> Self {
        ReduceGradOp {
            kind,
            attrs,
            functor: grad_functor(kind),
        }
    }

    pub fn kind(&self) -> ReduceKind {
        self.kind
    }

    fn name(&self) -> &'static str {
        maker::meta(self.kind).grad_name
    }

    /// Validates bindings with the same rules as the forward pass, then
    /// returns the input-gradient shape, or `None` when no consumer
    /// requested the gradient.
    pub fn infer_shape(
        &self,
        x: Option<&Tensor<T>>,
        grad_out: Option<&Tensor<T>>,
        grad_x_bound: bool,
    ) -> Result<Option<Vec<usize>>, ReduceError> {
        let x = required(x, "X", self.name())?;
        required(grad_out, &grad_var_name("Out"), self.name())?;
        if !grad_x_bound {
            return Ok(None);
        }
        infer_reduce_grad_shape(x.dims(), self.attrs.dim).map(Some)
    }

    /// Distributes `grad_out` back across the reduced axis into `grad_x`.
    ///
    /// When `grad_x` is `None` no consumer requested the gradient and the
    /// whole invocation is a no-op: nothing is validated against tensor
    /// data, nothing is resized, nothing is written.
    pub fn run(
        &self,
        x: Option<&Tensor<T>>,
        out: Option<&Tensor<T>>,
        grad_out: Option<&Tensor<T>>,
        grad_x: Option<&mut Tensor<T>>,
    ) -> Result<(), ReduceError> {
        let grad_x = match grad_x {
            Some(grad_x) => grad_x,
            None => return Ok(()),
        };
        let x = required(x, "X", self.name())?;
        let out = required(out, "Out", self.name())?;
        let grad_out = required(grad_out, &grad_var_name("Out"), self.name())?;
        let grad_dims = infer_reduce_grad_shape(x.dims(), self.attrs.dim)?;
        let axis = normalize_axis(self.attrs.dim, x.dims().len())?;
        trace!(
            "{}: distributing {:?} back across axis {} of {:?}",
            self.name(),
            grad_out.dims(),
            axis,
            grad_dims
        );

        ReduceGradKernel::new(self.functor.as_ref()).run(x, out, grad_out, grad_x, axis, &grad_dims)
    }
}

#[cfg(test)]
#[path = "op_test.rs"]
mod tests;
