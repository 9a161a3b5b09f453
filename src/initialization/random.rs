use rand::Rng;
use rand_distr::{Distribution, Uniform, uniform::Error as UniformError};

/// Samples the encoder weights of an autoencoder from a probabilistic distribution.
pub struct RandWeightGen<D: Distribution<f64>> {
    distribution: D,
}

impl<D: Distribution<f64>> RandWeightGen<D> {
    pub fn new(distribution: D) -> Self {
        Self { distribution }
    }

    /// Samples a `(n_visible, n_hidden)` weight matrix in row major order.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to draw from.
    /// * `n_visible` - The amount of rows.
    /// * `n_hidden` - The amount of columns.
    ///
    /// # Returns
    /// The `n_visible * n_hidden` weights.
    pub fn weights<R: Rng>(&self, rng: &mut R, n_visible: usize, n_hidden: usize) -> Vec<f64> {
        (0..n_visible * n_hidden)
            .map(|_| self.distribution.sample(rng))
            .collect()
    }
}

impl RandWeightGen<Uniform<f64>> {
    /// Creates a new `RandWeightGen` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(low: f64, high: f64) -> Result<Self, UniformError> {
        Ok(Self::new(Uniform::new(low, high)?))
    }

    /// Creates a new `RandWeightGen` for a layer of sigmoid units.
    ///
    /// Samples from `±4·sqrt(6 / (fan_in + fan_out))`, four times the Xavier range, which keeps
    /// the initial pre-activations inside the sigmoid's near linear region.
    ///
    /// # Arguments
    /// * `fan_in` - The number of input units.
    /// * `fan_out` - The number of output units.
    ///
    /// # Returns
    /// An error if the calculated range is invalid.
    pub fn sigmoid_uniform(fan_in: usize, fan_out: usize) -> Result<Self, UniformError> {
        let range = Self::sigmoid_range(fan_in, fan_out);
        Self::uniform(-range, range)
    }

    /// The half width of the `sigmoid_uniform` interval.
    pub fn sigmoid_range(fan_in: usize, fan_out: usize) -> f64 {
        4. * (6. / (fan_in + fan_out) as f64).sqrt()
    }
}
