use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};

use super::LossFn;

/// Binary cross-entropy, summed over the units of an example and averaged over the batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossEntropy;

impl CrossEntropy {
    /// Returns a new `CrossEntropy`.
    pub fn new() -> Self {
        Self
    }

    /// Computes the reconstruction cost of every example in the batch.
    ///
    /// # Arguments
    /// * `y_pred` - The predictions, each one in `(0, 1)`.
    /// * `y` - The targets, each one in `[0, 1]`.
    ///
    /// # Returns
    /// One cost per row of the batch.
    pub fn per_example(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array1<f64> {
        Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&p, &y| -(y * p.ln() + (1. - y) * (1. - p).ln()))
            .sum_axis(Axis(1))
    }
}

impl LossFn for CrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64 {
        self.per_example(y_pred, y).mean().unwrap_or_default()
    }

    // The sigmoid's derivative cancels the cross-entropy's denominator, leaving `p - y`.
    fn loss_prime(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64> {
        (&y_pred - &y) / y_pred.nrows() as f64
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn per_example_sums_over_units() {
        let y_pred = array![[0.5, 0.5], [0.25, 0.75]];
        let y = array![[1., 0.], [0., 1.]];

        let costs = CrossEntropy::new().per_example(y_pred.view(), y.view());
        let expected = [2. * 2f64.ln(), -2. * 0.75f64.ln()];

        for (got, expected) in costs.iter().zip(expected) {
            assert!((got - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn loss_is_the_mean_of_the_examples() {
        let y_pred = array![[0.5, 0.5], [0.25, 0.75]];
        let y = array![[1., 0.], [0., 1.]];
        let loss_fn = CrossEntropy::new();

        let costs = loss_fn.per_example(y_pred.view(), y.view());
        let loss = loss_fn.loss(y_pred.view(), y.view());
        assert!((loss - (costs[0] + costs[1]) / 2.).abs() < 1e-12);
    }

    #[test]
    fn loss_prime_is_scaled_residual() {
        let y_pred = array![[0.5, 0.25], [0.75, 0.5]];
        let y = array![[1., 0.], [0., 1.]];

        let d = CrossEntropy::new().loss_prime(y_pred.view(), y.view());
        assert_eq!(d, array![[-0.25, 0.125], [0.375, -0.25]]);
    }
}
