use ndarray::{Array2, ArrayView2};

/// The logistic sigmoid, `1 / (1 + e^-z)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn new() -> Self {
        Self
    }

    pub fn f(&self, z: f64) -> f64 {
        1. / (1. + (-z).exp())
    }

    /// The derivative expressed in terms of the sigmoid's own output `a = f(z)`.
    pub fn df(&self, a: f64) -> f64 {
        a * (1. - a)
    }

    /// Applies the sigmoid in place over a whole batch of pre-activations.
    pub fn forward(&self, z: Array2<f64>) -> Array2<f64> {
        z.mapv_into(|z| self.f(z))
    }

    /// Maps a batch of activations to their derivatives.
    pub fn derivative(&self, a: ArrayView2<f64>) -> Array2<f64> {
        a.mapv(|a| self.df(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_at_one_half() {
        let sigmoid = Sigmoid::new();
        assert_eq!(sigmoid.f(0.), 0.5);
        assert_eq!(sigmoid.df(sigmoid.f(0.)), 0.25);
    }

    #[test]
    fn derivative_matches_finite_differences() {
        let sigmoid = Sigmoid::new();
        let eps = 1e-6;

        for z in [-3., -0.5, 0.2, 1.7] {
            let numeric = (sigmoid.f(z + eps) - sigmoid.f(z - eps)) / (2. * eps);
            let analytic = sigmoid.df(sigmoid.f(z));
            assert!((numeric - analytic).abs() < 1e-8, "z = {z}");
        }
    }
}
