//! The functor set: pluggable value-combination rules shared by every
//! reduction operator.
//!
//! A functor is a stateless unit struct implementing [`ReduceFunctor`]
//! (forward) or [`GradFunctor`] (backward). The kernel executor iterates the
//! tensor and calls the functor once per reduced lane, so the four operators
//! and their gradients share one execution path and differ only here.
//! Statelessness makes every functor trivially reentrant; the `Send + Sync`
//! supertrait bound captures that at the type level.

use num_traits::Float;

/// Forward combination rule: collapses one reduced lane into a single value.
pub trait ReduceFunctor<T>: Send + Sync {
    fn reduce(&self, values: &[T]) -> T;
}

/// Backward distribution rule: broadcasts the output gradient of one lane
/// back across the lane's positions.
///
/// `x_values` and `grad_x` cover the same lane of the input; `y_value` is the
/// forward output for that lane. Every slot of `grad_x` is written.
pub trait GradFunctor<T>: Send + Sync {
    fn distribute(&self, grad_out: T, x_values: &[T], y_value: T, grad_x: &mut [T]);
}

/// Arithmetic sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumFunctor;

impl<T: Float> ReduceFunctor<T> for SumFunctor {
    fn reduce(&self, values: &[T]) -> T {
        values.iter().fold(T::zero(), |acc, &v| acc + v)
    }
}

/// Arithmetic mean over the reduced lane.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanFunctor;

impl<T: Float> ReduceFunctor<T> for MeanFunctor {
    fn reduce(&self, values: &[T]) -> T {
        let (sum, n) = values
            .iter()
            .fold((T::zero(), T::zero()), |(sum, n), &v| (sum + v, n + T::one()));
        sum / n
    }
}

/// Element-wise maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFunctor;

impl<T: Float> ReduceFunctor<T> for MaxFunctor {
    fn reduce(&self, values: &[T]) -> T {
        values
            .iter()
            .fold(T::neg_infinity(), |m, &v| if v > m { v } else { m })
    }
}

/// Element-wise minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinFunctor;

impl<T: Float> ReduceFunctor<T> for MinFunctor {
    fn reduce(&self, values: &[T]) -> T {
        values
            .iter()
            .fold(T::infinity(), |m, &v| if v < m { v } else { m })
    }
}

/// Gradient of sum: every position receives the output gradient unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumGradFunctor;

impl<T: Float> GradFunctor<T> for SumGradFunctor {
    fn distribute(&self, grad_out: T, x_values: &[T], _y_value: T, grad_x: &mut [T]) {
        debug_assert_eq!(x_values.len(), grad_x.len());
        for g in grad_x.iter_mut() {
            *g = grad_out;
        }
    }
}

/// Gradient of mean: every position receives `grad_out / count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanGradFunctor;

impl<T: Float> GradFunctor<T> for MeanGradFunctor {
    fn distribute(&self, grad_out: T, x_values: &[T], _y_value: T, grad_x: &mut [T]) {
        debug_assert_eq!(x_values.len(), grad_x.len());
        let n = x_values.iter().fold(T::zero(), |n, _| n + T::one());
        let share = grad_out / n;
        for g in grad_x.iter_mut() {
            *g = share;
        }
    }
}

/// Gradient of max and min: the gradient flows back only to the positions
/// that produced the extremum (`x == y`); everywhere else it is zero. Ties
/// each receive the full gradient, not a split share, the usual sub-gradient
/// convention for non-unique extrema.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxOrMinGradFunctor;

impl<T: Float> GradFunctor<T> for MaxOrMinGradFunctor {
    fn distribute(&self, grad_out: T, x_values: &[T], y_value: T, grad_x: &mut [T]) {
        debug_assert_eq!(x_values.len(), grad_x.len());
        for (g, &x) in grad_x.iter_mut().zip(x_values) {
            *g = if x == y_value { grad_out } else { T::zero() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_functors() {
        let values = [1.0_f32, 2.0, 3.0, 4.0];
        assert_relative_eq!(SumFunctor.reduce(&values), 10.0);
        assert_relative_eq!(MeanFunctor.reduce(&values), 2.5);
        assert_relative_eq!(MaxFunctor.reduce(&values), 4.0);
        assert_relative_eq!(MinFunctor.reduce(&values), 1.0);
    }

    #[test]
    fn test_max_min_on_negatives() {
        let values = [-3.0_f64, -1.0, -2.0];
        assert_relative_eq!(MaxFunctor.reduce(&values), -1.0);
        assert_relative_eq!(MinFunctor.reduce(&values), -3.0);
    }

    #[test]
    fn test_sum_grad_broadcasts_unchanged() {
        let x = [1.0_f32, 2.0, 3.0];
        let mut grad = [0.0_f32; 3];
        SumGradFunctor.distribute(2.5, &x, 6.0, &mut grad);
        assert_eq!(grad, [2.5, 2.5, 2.5]);
    }

    #[test]
    fn test_mean_grad_divides_by_count() {
        let x = [1.0_f32, 2.0, 3.0, 4.0];
        let mut grad = [0.0_f32; 4];
        MeanGradFunctor.distribute(2.0, &x, 2.5, &mut grad);
        assert_eq!(grad, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_max_grad_ties_get_full_gradient() {
        let x = [2.0_f32, 5.0, 5.0, 1.0];
        let mut grad = [0.0_f32; 4];
        MaxOrMinGradFunctor.distribute(3.0, &x, 5.0, &mut grad);
        assert_eq!(grad, [0.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn test_min_grad_uses_same_functor() {
        let x = [2.0_f32, 5.0, 5.0, 1.0];
        let mut grad = [7.0_f32; 4];
        MaxOrMinGradFunctor.distribute(3.0, &x, 1.0, &mut grad);
        assert_eq!(grad, [0.0, 0.0, 0.0, 3.0]);
    }
}
