use super::*;
use crate::error::ReduceError;

#[test]
fn test_negative_dim_normalizes_for_all_ranks() {
    for rank in 1..=6usize {
        let x_dims: Vec<usize> = (0..rank).map(|i| i + 2).collect();
        for dim in -(rank as i64)..rank as i64 {
            let inferred = infer_reduce_shape(&x_dims, dim, true).unwrap();
            let expected_axis = if dim < 0 {
                (rank as i64 + dim) as usize
            } else {
                dim as usize
            };
            assert_eq!(inferred.axis, expected_axis, "rank {rank}, dim {dim}");
            assert!(inferred.axis < rank);
        }
    }
}

#[test]
fn test_keep_dim_preserves_rank() {
    for rank in 1..=6usize {
        let x_dims: Vec<usize> = (0..rank).map(|i| i + 2).collect();
        for axis in 0..rank {
            let inferred = infer_reduce_shape(&x_dims, axis as i64, true).unwrap();
            assert_eq!(inferred.out_dims.len(), rank);
            assert_eq!(inferred.out_dims[axis], 1);
            for (i, &d) in inferred.out_dims.iter().enumerate() {
                if i != axis {
                    assert_eq!(d, x_dims[i]);
                }
            }
        }
    }
}

#[test]
fn test_no_keep_dim_drops_rank() {
    for rank in 2..=6usize {
        let x_dims: Vec<usize> = (0..rank).map(|i| i + 2).collect();
        for axis in 0..rank {
            let inferred = infer_reduce_shape(&x_dims, axis as i64, false).unwrap();
            assert_eq!(inferred.out_dims.len(), rank - 1);
            let mut expected = x_dims.clone();
            expected.remove(axis);
            assert_eq!(inferred.out_dims, expected);
        }
    }
}

#[test]
fn test_rank_one_behaves_as_keep_dim() {
    let inferred = infer_reduce_shape(&[5], 0, false).unwrap();
    assert_eq!(inferred.out_dims, vec![1]);
    assert!(!inferred.propagate_lod);
}

#[test]
fn test_lod_propagates_iff_axis_nonzero() {
    let x_dims = [4, 3, 2];
    assert!(!infer_reduce_shape(&x_dims, 0, false).unwrap().propagate_lod);
    assert!(infer_reduce_shape(&x_dims, 1, false).unwrap().propagate_lod);
    assert!(infer_reduce_shape(&x_dims, 2, false).unwrap().propagate_lod);
    // dim = -3 normalizes to the leading axis
    assert!(!infer_reduce_shape(&x_dims, -3, false).unwrap().propagate_lod);
    assert!(infer_reduce_shape(&x_dims, -1, false).unwrap().propagate_lod);
}

#[test]
fn test_concrete_middle_axis() {
    let inferred = infer_reduce_shape(&[4, 3, 2], 1, false).unwrap();
    assert_eq!(inferred.out_dims, vec![4, 2]);
    assert_eq!(inferred.axis, 1);
    assert!(inferred.propagate_lod);
}

#[test]
fn test_concrete_negative_dim_keep_dim() {
    let inferred = infer_reduce_shape(&[4, 3, 2], -1, true).unwrap();
    assert_eq!(inferred.axis, 2);
    assert_eq!(inferred.out_dims, vec![4, 3, 1]);
}

#[test]
fn test_rank_above_six_rejected() {
    let x_dims = [2, 2, 2, 2, 2, 2, 2];
    assert_eq!(
        infer_reduce_shape(&x_dims, 0, false).unwrap_err(),
        ReduceError::RankTooHigh { rank: 7 }
    );
    assert_eq!(
        infer_reduce_grad_shape(&x_dims, 0).unwrap_err(),
        ReduceError::RankTooHigh { rank: 7 }
    );
}

#[test]
fn test_out_of_range_dim_rejected() {
    assert_eq!(
        infer_reduce_shape(&[4, 3, 2], 5, false).unwrap_err(),
        ReduceError::InvalidAxis { dim: 5, rank: 3 }
    );
    // Still out of range after normalization
    assert_eq!(
        infer_reduce_shape(&[4, 3, 2], -4, false).unwrap_err(),
        ReduceError::InvalidAxis { dim: -4, rank: 3 }
    );
}

#[test]
fn test_grad_shape_is_input_shape() {
    let x_dims = [4, 3, 2];
    for dim in -3i64..3 {
        assert_eq!(
            infer_reduce_grad_shape(&x_dims, dim).unwrap(),
            x_dims.to_vec()
        );
    }
}

#[test]
fn test_grad_shape_validation_parity() {
    // The backward pass must reject exactly what the forward pass rejects.
    let x_dims = [4, 3, 2];
    for dim in [-7i64, -4, 3, 5] {
        let fwd = infer_reduce_shape(&x_dims, dim, false).unwrap_err();
        let bwd = infer_reduce_grad_shape(&x_dims, dim).unwrap_err();
        assert_eq!(fwd, bwd);
    }
}
