use std::num::NonZeroUsize;

use log::debug;
use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};
use rand::Rng;

use super::{
    ParamKind, ParamManager, ParamView,
    activations::Sigmoid,
    loss::{CrossEntropy, LossFn, contraction},
};
use crate::{
    CaErr, Result,
    initialization::RandWeightGen,
    optimization::{GradientDescent, Optimizer},
};

/// A contractive autoencoder: one sigmoid hidden layer with tied weights, trained to reconstruct
/// its input while keeping the Jacobian of the hidden layer small.
///
/// The model does not own its parameters. Every operation reads them from a `ParamView` and `step`
/// writes them back through a `ParamManager`, so the same buffers can be shared between models.
#[derive(Debug, Clone)]
pub struct ContractiveAutoencoder {
    n_visible: usize,
    n_hidden: usize,
    batch_size: NonZeroUsize,
    sigmoid: Sigmoid,
    loss_fn: CrossEntropy,
}

/// The activations of a forward pass over a batch.
struct Forward {
    hidden: Array2<f64>,
    reconstruction: Array2<f64>,
}

impl ContractiveAutoencoder {
    /// Creates a new `ContractiveAutoencoder` with a batch size of one.
    ///
    /// # Arguments
    /// * `n_visible` - The amount of visible (input) units.
    /// * `n_hidden` - The amount of hidden units.
    ///
    /// # Returns
    /// A new `ContractiveAutoencoder` instance.
    pub fn new(n_visible: usize, n_hidden: usize) -> Self {
        Self {
            n_visible,
            n_hidden,
            batch_size: NonZeroUsize::MIN,
            sigmoid: Sigmoid::new(),
            loss_fn: CrossEntropy::new(),
        }
    }

    /// Sets the amount of rows every batch given to this model must have.
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn n_visible(&self) -> usize {
        self.n_visible
    }

    pub fn n_hidden(&self) -> usize {
        self.n_hidden
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Returns the amount of parameters in the model.
    pub fn size(&self) -> usize {
        ParamKind::ALL
            .iter()
            .map(|kind| kind.len(self.n_visible, self.n_hidden))
            .sum()
    }

    /// Generates a fresh set of parameters laid out as `[W | b_h | b_v]`.
    ///
    /// The weights are sampled uniformly from `±4·sqrt(6 / (n_hidden + n_visible))` in row major
    /// order and both biases start at zero.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to sample the weights with.
    ///
    /// # Returns
    /// The parameters or an error if the sampling range is invalid.
    pub fn init_params<R: Rng>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let weight_gen = RandWeightGen::sigmoid_uniform(self.n_visible, self.n_hidden)?;

        let mut params = weight_gen.weights(rng, self.n_visible, self.n_hidden);
        params.resize(self.size(), 0.);
        Ok(params)
    }

    /// Creates a `ParamManager` for this model over a single `[W | b_h | b_v]` buffer.
    pub fn param_manager<'p>(&self, params: &'p mut [f64]) -> Result<ParamManager<'p>> {
        ParamManager::from_flat(self.n_visible, self.n_hidden, params)
    }

    /// Creates an empty `ParamManager` for this model, to be filled with `ParamManager::add`.
    pub fn empty_param_manager<'p>(&self) -> ParamManager<'p> {
        ParamManager::new(self.n_visible, self.n_hidden)
    }

    /// Computes the hidden activations, `sigmoid(x·W + b_h)`.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input batch, one example per row.
    ///
    /// # Returns
    /// The `(rows, n_hidden)` hidden activations, or an error if the shapes don't match.
    pub fn encode(&self, params: &ParamView, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_params(params)?;
        Self::check_size("input columns", x.ncols(), self.n_visible)?;

        Ok(self.sigmoid.forward(x.dot(&params.w()) + &params.b_h()))
    }

    /// Computes the reconstruction of the input, `sigmoid(hidden·Wᵗ + b_v)`.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `hidden` - The hidden activations, one example per row.
    ///
    /// # Returns
    /// The `(rows, n_visible)` reconstruction, or an error if the shapes don't match.
    pub fn decode(&self, params: &ParamView, hidden: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_params(params)?;
        Self::check_size("hidden columns", hidden.ncols(), self.n_hidden)?;

        Ok(self.sigmoid.forward(hidden.dot(&params.w_prime()) + &params.b_v()))
    }

    /// Computes the Jacobian of the hidden layer with respect to the input for every example.
    ///
    /// # Arguments
    /// * `hidden` - The `(batch_size, n_hidden)` hidden activations.
    /// * `w` - The `(n_visible, n_hidden)` encoder weights.
    ///
    /// # Returns
    /// The `(batch_size, n_visible, n_hidden)` tensor, or an error if the shapes don't match.
    pub fn jacobian(&self, hidden: ArrayView2<f64>, w: ArrayView2<f64>) -> Result<Array3<f64>> {
        Self::check_size("hidden rows", hidden.nrows(), self.batch_size())?;
        Self::check_size("hidden columns", hidden.ncols(), self.n_hidden)?;
        Self::check_size("weight rows", w.nrows(), self.n_visible)?;
        Self::check_size("weight columns", w.ncols(), self.n_hidden)?;

        Ok(contraction::jacobian(hidden, w))
    }

    /// Computes the loss: the mean cross-entropy of the reconstruction plus `contraction_level`
    /// times the squared norm of the Jacobian averaged over the batch.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The `(batch_size, n_visible)` input batch, with values in `[0, 1]`.
    /// * `contraction_level` - The weight of the contraction penalty, zero disables it.
    ///
    /// # Returns
    /// The loss, or an error if the shapes don't match.
    pub fn loss(
        &self,
        params: &ParamView,
        x: ArrayView2<f64>,
        contraction_level: f64,
    ) -> Result<f64> {
        let forward = self.forward(params, x)?;
        Ok(self.objective(params, &forward, x, contraction_level))
    }

    /// Computes the loss and its gradient with respect to `W`, `b_h` and `b_v`.
    ///
    /// `W` is read by the encoder, by the decoder through its transpose and by the penalty, so its
    /// gradient accumulates the three paths.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The `(batch_size, n_visible)` input batch.
    /// * `contraction_level` - The weight of the contraction penalty.
    ///
    /// # Returns
    /// A tuple with the loss and the gradients, or an error if the shapes don't match.
    pub fn gradients(
        &self,
        params: &ParamView,
        x: ArrayView2<f64>,
        contraction_level: f64,
    ) -> Result<(f64, Gradients)> {
        let forward = self.forward(params, x)?;
        let loss = self.objective(params, &forward, x, contraction_level);

        let Forward {
            hidden,
            reconstruction,
        } = forward;
        let w = params.w();

        // Decoder, where W is read through its transpose.
        let dz = self.loss_fn.loss_prime(reconstruction.view(), x);
        let db_v = dz.sum_axis(Axis(0));
        let mut dw = dz.t().dot(&hidden);

        // Penalty
        let (dpenalty_hidden, dpenalty_w) =
            contraction::penalty_prime(hidden.view(), w, self.batch_size());
        dw.scaled_add(contraction_level, &dpenalty_w);

        // Encoder
        let dhidden = dz.dot(&w) + dpenalty_hidden * contraction_level;
        let da = dhidden * self.sigmoid.derivative(hidden.view());
        let db_h = da.sum_axis(Axis(0));
        dw += &x.t().dot(&da);

        Ok((
            loss,
            Gradients {
                w: dw,
                b_h: db_h,
                b_v: db_v,
            },
        ))
    }

    /// Computes the loss and the parameters a gradient descent step would produce, without
    /// writing them.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The `(batch_size, n_visible)` input batch.
    /// * `contraction_level` - The weight of the contraction penalty.
    /// * `learning_rate` - The length of the step.
    ///
    /// # Returns
    /// A tuple with the loss and the updated parameters laid out as `[W | b_h | b_v]`.
    pub fn cost_updates(
        &self,
        params: &ParamView,
        x: ArrayView2<f64>,
        contraction_level: f64,
        learning_rate: f64,
    ) -> Result<(f64, Vec<f64>)> {
        let (loss, grad) = self.gradients(params, x, contraction_level)?;

        let mut updated = params.to_flat();
        GradientDescent::new(learning_rate).update_params(&mut updated, &grad.to_flat());

        Ok((loss, updated))
    }

    /// Makes a gradient descent step over the given batch.
    ///
    /// # Arguments
    /// * `params` - The manager of the parameters to update.
    /// * `x` - The `(batch_size, n_visible)` input batch.
    /// * `contraction_level` - The weight of the contraction penalty.
    /// * `learning_rate` - The length of the step.
    ///
    /// # Returns
    /// The loss before the update.
    pub fn step(
        &self,
        params: &mut ParamManager<'_>,
        x: ArrayView2<f64>,
        contraction_level: f64,
        learning_rate: f64,
    ) -> Result<f64> {
        let mut optimizer = GradientDescent::new(learning_rate);
        self.step_with(params, x, contraction_level, &mut optimizer)
    }

    /// Same as `step` but lets `optimizer` decide how to apply the gradients.
    ///
    /// Every read happens before the first write, an error leaves the parameters untouched.
    pub fn step_with<O: Optimizer>(
        &self,
        params: &mut ParamManager<'_>,
        x: ArrayView2<f64>,
        contraction_level: f64,
        optimizer: &mut O,
    ) -> Result<f64> {
        let (loss, grad) = self.gradients(&params.view()?, x, contraction_level)?;
        let grad = grad.to_flat();

        for (kind, slot) in ParamKind::ALL.into_iter().zip(params.slots_mut()?) {
            optimizer.update_params(slot, &grad[kind.range(self.n_visible, self.n_hidden)]);
        }

        debug!(loss = loss, contraction_level = contraction_level; "step done");
        Ok(loss)
    }

    fn forward(&self, params: &ParamView, x: ArrayView2<f64>) -> Result<Forward> {
        Self::check_size("batch rows", x.nrows(), self.batch_size())?;

        let hidden = self.encode(params, x)?;
        let reconstruction = self.decode(params, hidden.view())?;

        Ok(Forward {
            hidden,
            reconstruction,
        })
    }

    fn objective(
        &self,
        params: &ParamView,
        forward: &Forward,
        x: ArrayView2<f64>,
        contraction_level: f64,
    ) -> f64 {
        let reconstruction_cost = self.loss_fn.loss(forward.reconstruction.view(), x);
        let penalty =
            contraction::penalty_closed_form(forward.hidden.view(), params.w(), self.batch_size());

        reconstruction_cost + contraction_level * penalty
    }

    fn check_params(&self, params: &ParamView) -> Result<()> {
        let (rows, cols) = params.w().dim();
        Self::check_size("weight rows", rows, self.n_visible)?;
        Self::check_size("weight columns", cols, self.n_hidden)
    }

    fn check_size(what: &'static str, got: usize, expected: usize) -> Result<()> {
        if got != expected {
            return Err(CaErr::SizeMismatch {
                what,
                got,
                expected,
            });
        }

        Ok(())
    }
}

/// The gradient of the loss with respect to each of the model's parameters.
#[derive(Debug, Clone)]
pub struct Gradients {
    w: Array2<f64>,
    b_h: Array1<f64>,
    b_v: Array1<f64>,
}

impl Gradients {
    /// Copies the gradients into a new buffer laid out as `[W | b_h | b_v]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.w
            .iter()
            .chain(&self.b_h)
            .chain(&self.b_v)
            .copied()
            .collect()
    }
}
