use ndarray::{Array2, ArrayView2};

pub trait LossFn {
    /// Returns the mean loss over the rows of the batch.
    fn loss(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> f64;

    /// Returns the gradient of `loss` with respect to the logits the sigmoid output layer turned
    /// into `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f64>, y: ArrayView2<f64>) -> Array2<f64>;
}
