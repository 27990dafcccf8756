//! Shape inference for the reduction operator family.
//!
//! Both the forward and the gradient inferencers are pure functions: they
//! read only the input dimensions and the `dim`/`keep_dim` attributes, and
//! never touch tensor data. A failed inference therefore cannot have resized
//! anything.

use crate::error::ReduceError;

/// Tensors with rank above this are rejected everywhere in the family.
pub const MAX_RANK: usize = 6;

/// Result of forward shape inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredShape {
    /// Dimensions the output tensor must be resized to.
    pub out_dims: Vec<usize>,
    /// The reduction axis after negative-index normalization.
    pub axis: usize,
    /// Whether the input's sequence-length metadata is forwarded to the
    /// output. Collapsing the leading axis invalidates per-sequence lengths,
    /// so this is true exactly when `axis != 0`.
    pub propagate_lod: bool,
}

/// Validates the rank and normalizes a possibly-negative `dim` attribute to
/// an in-range axis index.
pub(crate) fn normalize_axis(dim: i64, rank: usize) -> Result<usize, ReduceError> {
    if rank > MAX_RANK {
        return Err(ReduceError::RankTooHigh { rank });
    }
    let normalized = if dim < 0 { dim + rank as i64 } else { dim };
    if normalized < 0 || normalized >= rank as i64 {
        // Report the attribute value as written, not the normalized one.
        return Err(ReduceError::InvalidAxis { dim, rank });
    }
    Ok(normalized as usize)
}

/// Computes the output shape of a single-axis reduction.
///
/// When `keep_dim` is true, or the input is rank 1, the reduced axis is
/// retained with length 1; otherwise it is removed and the rank drops by one.
pub fn infer_reduce_shape(
    x_dims: &[usize],
    dim: i64,
    keep_dim: bool,
) -> Result<InferredShape, ReduceError> {
    let axis = normalize_axis(dim, x_dims.len())?;
    let mut out_dims = x_dims.to_vec();
    if keep_dim || x_dims.len() == 1 {
        out_dims[axis] = 1;
    } else {
        out_dims.remove(axis);
    }
    Ok(InferredShape {
        out_dims,
        axis,
        propagate_lod: axis != 0,
    })
}

/// Computes the shape of the input gradient for a single-axis reduction.
///
/// Performs the same rank and axis validation as [`infer_reduce_shape`] so
/// the backward pass rejects exactly the configurations the forward pass
/// rejects, then returns the input dimensions unchanged: reduction is
/// reversed by broadcasting, so the gradient always has the input's shape,
/// independent of `keep_dim`.
pub fn infer_reduce_grad_shape(x_dims: &[usize], dim: i64) -> Result<Vec<usize>, ReduceError> {
    normalize_axis(dim, x_dims.len())?;
    Ok(x_dims.to_vec())
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod tests;
