//! The kernel executor: one iteration scheme shared by every reduction
//! operator and gradient.
//!
//! A contiguous row-major tensor reduced along `axis` decomposes into
//! `outer * inner` independent lanes of length `dims[axis]`, where `outer`
//! is the product of the dimensions before the axis and `inner` the product
//! of those after it. Element `k` of lane `(o, i)` sits at flat index
//! `(o * len + k) * inner + i`; the lane's output element sits at
//! `o * inner + i` regardless of `keep_dim`, since a kept axis only inserts
//! a length-1 dimension. The executor walks every lane, gathers it into a
//! scratch buffer, and applies the bound functor once per lane, so each
//! output element is written by exactly one iteration.

use num_traits::Float;

use super::functor::{GradFunctor, ReduceFunctor};
use super::shape::InferredShape;
use crate::error::ReduceError;
use crate::tensor::Tensor;

/// Lane decomposition of `dims` around the reduced `axis`.
fn lane_geometry(dims: &[usize], axis: usize) -> (usize, usize, usize) {
    let outer = dims[..axis].iter().product();
    let len = dims[axis];
    let inner = dims[axis + 1..].iter().product();
    (outer, len, inner)
}

/// Executes a forward reduction with the bound functor.
pub struct ReduceKernel<'f, T> {
    functor: &'f dyn ReduceFunctor<T>,
}

impl<'f, T: Float + Default> ReduceKernel<'f, T> {
    pub fn new(functor: &'f dyn ReduceFunctor<T>) -> Self {
        ReduceKernel { functor }
    }

    /// Resizes `output` to the inferred shape and fills it, one functor
    /// application per reduced lane. `input` is never mutated.
    pub fn run(
        &self,
        input: &Tensor<T>,
        output: &mut Tensor<T>,
        inferred: &InferredShape,
    ) -> Result<(), ReduceError> {
        let (outer, len, inner) = lane_geometry(input.dims(), inferred.axis);
        output.resize(inferred.out_dims.clone());

        let mut lane = vec![T::zero(); len];
        let in_data = input.data();
        let out_data = output.data_mut();
        for o in 0..outer {
            for i in 0..inner {
                for (k, slot) in lane.iter_mut().enumerate() {
                    *slot = in_data[(o * len + k) * inner + i];
                }
                out_data[o * inner + i] = self.functor.reduce(&lane);
            }
        }
        Ok(())
    }
}

/// Executes a backward reduction with the bound gradient functor.
pub struct ReduceGradKernel<'f, T> {
    functor: &'f dyn GradFunctor<T>,
}

impl<'f, T: Float + Default> ReduceGradKernel<'f, T> {
    pub fn new(functor: &'f dyn GradFunctor<T>) -> Self {
        ReduceGradKernel { functor }
    }

    /// Resizes `grad_x` to `grad_dims` (the input's shape) and fills it by
    /// distributing each lane's output gradient back across the lane.
    ///
    /// `output` and `grad_out` both have one element per lane; `keep_dim`
    /// does not change their flat layout.
    pub fn run(
        &self,
        input: &Tensor<T>,
        output: &Tensor<T>,
        grad_out: &Tensor<T>,
        grad_x: &mut Tensor<T>,
        axis: usize,
        grad_dims: &[usize],
    ) -> Result<(), ReduceError> {
        let (outer, len, inner) = lane_geometry(input.dims(), axis);
        debug_assert_eq!(grad_out.numel(), outer * inner);
        grad_x.resize(grad_dims.to_vec());

        let mut x_lane = vec![T::zero(); len];
        let mut g_lane = vec![T::zero(); len];
        let in_data = input.data();
        let out_data = output.data();
        let grad_out_data = grad_out.data();
        let grad_x_data = grad_x.data_mut();
        for o in 0..outer {
            for i in 0..inner {
                let lane_idx = o * inner + i;
                for (k, slot) in x_lane.iter_mut().enumerate() {
                    *slot = in_data[(o * len + k) * inner + i];
                }
                self.functor.distribute(
                    grad_out_data[lane_idx],
                    &x_lane,
                    out_data[lane_idx],
                    &mut g_lane,
                );
                for (k, &g) in g_lane.iter().enumerate() {
                    grad_x_data[(o * len + k) * inner + i] = g;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "kernel_test.rs"]
mod tests;
