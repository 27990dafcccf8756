//! Minimal tensor descriptor used by the reduction operators.
//!
//! The surrounding engine owns variable storage; an operator only ever reads
//! its input tensor and exclusively owns (through the kernel executor) the
//! output tensor it resizes. The descriptor here is therefore deliberately
//! small: ordered dimensions, a contiguous row-major buffer, and optional
//! sequence-length metadata ([`Lod`]) shared by reference.

use std::sync::Arc;

use crate::error::ReduceError;

/// Sequence-length metadata ("level of detail") for batched variable-length
/// sequences. Each level stores offsets delimiting sequences within the
/// leading axis. Shared between tensors via `Arc`, never copied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lod(pub Vec<Vec<usize>>);

/// An n-dimensional array with contiguous row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    dims: Vec<usize>,
    data: Vec<T>,
    lod: Option<Arc<Lod>>,
}

impl<T> Tensor<T> {
    /// Creates a tensor from a flat row-major buffer and its dimensions.
    ///
    /// Fails with [`ReduceError::LengthMismatch`] when the buffer length does
    /// not equal the product of `dims`.
    pub fn new(data: Vec<T>, dims: Vec<usize>) -> Result<Self, ReduceError> {
        let numel: usize = dims.iter().product();
        if data.len() != numel {
            return Err(ReduceError::LengthMismatch {
                data_len: data.len(),
                dims,
            });
        }
        Ok(Tensor {
            dims,
            data,
            lod: None,
        })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The sequence-length metadata attached to this tensor, if any.
    pub fn lod(&self) -> Option<&Arc<Lod>> {
        self.lod.as_ref()
    }

    pub fn set_lod(&mut self, lod: Option<Arc<Lod>>) {
        self.lod = lod;
    }
}

impl<T: Copy + Default> Tensor<T> {
    /// Creates a tensor of the given shape with every element set to `value`.
    pub fn full(dims: Vec<usize>, value: T) -> Self {
        let numel = dims.iter().product();
        Tensor {
            dims,
            data: vec![value; numel],
            lod: None,
        }
    }

    /// Reshapes the descriptor to `dims`, reallocating the buffer when the
    /// element count changes. Existing contents are not preserved across a
    /// reallocation; callers overwrite every element after resizing.
    pub fn resize(&mut self, dims: Vec<usize>) {
        let numel: usize = dims.iter().product();
        if self.data.len() != numel {
            self.data = vec![T::default(); numel];
        }
        self.dims = dims;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        let t = Tensor::new(vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        assert_eq!(t.dims(), &[2, 3]);
        assert_eq!(t.numel(), 6);

        let err = Tensor::new(vec![1.0_f32, 2.0], vec![2, 3]).unwrap_err();
        assert_eq!(
            err,
            ReduceError::LengthMismatch {
                data_len: 2,
                dims: vec![2, 3],
            }
        );
    }

    #[test]
    fn test_resize_reallocates_on_numel_change() {
        let mut t = Tensor::full(vec![2, 3], 1.0_f32);
        t.resize(vec![3, 2]);
        assert_eq!(t.dims(), &[3, 2]);
        assert_eq!(t.data().len(), 6);

        t.resize(vec![4]);
        assert_eq!(t.dims(), &[4]);
        assert_eq!(t.data(), &[0.0; 4]);
    }

    #[test]
    fn test_lod_is_shared_by_reference() {
        let lod = Arc::new(Lod(vec![vec![0, 2, 5]]));
        let mut t = Tensor::full(vec![5, 2], 0.0_f32);
        t.set_lod(Some(lod.clone()));
        assert!(Arc::ptr_eq(t.lod().unwrap(), &lod));
    }
}
