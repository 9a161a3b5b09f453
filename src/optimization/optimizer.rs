/// Defines the strategy for updating model parameters based on calculated gradients.
///
/// The `Optimizer` trait is responsible for the transition of the parameters from step `t` to
/// `t + 1`. It gets called once per parameter tensor, so stateful implementations must be ready
/// to see the same tensors in the same order on every step.
pub trait Optimizer {
    /// Updates the provided slice of parameters using its gradient.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The gradient corresponding to `params`.
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]);
}
