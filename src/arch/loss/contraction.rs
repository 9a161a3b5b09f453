//! The contraction penalty: the squared Frobenius norm of the Jacobian of the hidden layer with
//! respect to the input, averaged over the batch.
//!
//! With sigmoid hidden units `h = σ(x·W + b)`, the Jacobian of a single example is
//! `J[v, h] = h(1 - h) · W[v, h]`, so the whole penalty only depends on the hidden activations
//! and the weights.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::arch::activations::Sigmoid;

/// Computes the Jacobian tensor of the hidden layer.
///
/// # Arguments
/// * `hidden` - The hidden activations, shaped `(batch, n_hidden)`.
/// * `w` - The encoder weights, shaped `(n_visible, n_hidden)`.
///
/// # Returns
/// A `(batch, n_visible, n_hidden)` tensor with
/// `J[b, v, h] = hidden[b, h](1 - hidden[b, h]) w[v, h]`.
pub fn jacobian(hidden: ArrayView2<f64>, w: ArrayView2<f64>) -> Array3<f64> {
    let s = Sigmoid::new().derivative(hidden);
    let shape = (hidden.nrows(), w.nrows(), w.ncols());

    Array3::from_shape_fn(shape, |(b, v, h)| s[[b, h]] * w[[v, h]])
}

/// Computes the penalty, the sum of the squares of every entry of the Jacobian divided by the
/// batch size, without building the Jacobian tensor.
pub fn penalty_closed_form(
    hidden: ArrayView2<f64>,
    w: ArrayView2<f64>,
    batch_size: usize,
) -> f64 {
    let s2 = Sigmoid::new().derivative(hidden).mapv_into(|s| s * s);
    let w2 = w.mapv(|w| w * w).sum_axis(Axis(0));

    (s2 * &w2).sum() / batch_size as f64
}

/// Computes the gradient of the penalty with respect to the hidden activations and with respect
/// to the weights it reads directly.
///
/// # Arguments
/// * `hidden` - The hidden activations.
/// * `w` - The encoder weights.
/// * `batch_size` - The divisor of the penalty.
///
/// # Returns
/// A tuple containing `dpenalty/dhidden` and `dpenalty/dw`.
pub fn penalty_prime(
    hidden: ArrayView2<f64>,
    w: ArrayView2<f64>,
    batch_size: usize,
) -> (Array2<f64>, Array2<f64>) {
    let scale = 2. / batch_size as f64;
    let s = Sigmoid::new().derivative(hidden);
    let w2 = w.mapv(|w| w * w).sum_axis(Axis(0));
    let s2 = s.mapv(|s| s * s).sum_axis(Axis(0));

    // d(s²)/dh = 2s(1 - 2h)
    let dhidden = s * &hidden.mapv(|h| 1. - 2. * h) * &w2 * scale;
    let dw = &w * &s2 * scale;

    (dhidden, dw)
}
