use log::info;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ContractiveAutoencoder, Result,
    optimization::GradientDescent,
    specs::{ModelSpec, OptimizerSpec, TrainerSpec},
};

/// Everything a training driver needs to start calling `ContractiveAutoencoder::step`.
pub struct Session {
    pub model: ContractiveAutoencoder,
    pub params: Vec<f64>,
    pub optimizer: GradientDescent,
    pub rng: StdRng,
}

/// Builds autoencoders given a specification.
#[derive(Default)]
pub struct AutoencoderBuilder;

impl AutoencoderBuilder {
    /// Creates a new `AutoencoderBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `ContractiveAutoencoder` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the model.
    pub fn build_model(&self, spec: &ModelSpec) -> ContractiveAutoencoder {
        ContractiveAutoencoder::new(spec.n_visible, spec.n_hidden).with_batch_size(spec.batch_size)
    }

    /// Builds a model, its initial parameters and its optimizer following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the training run.
    ///
    /// # Returns
    /// A new `Session`, or an error if the parameters couldn't be generated.
    pub fn build(&self, spec: &TrainerSpec) -> Result<Session> {
        let model = self.build_model(&spec.model);
        let mut rng = self.generate_rng(spec.seed);
        let params = model.init_params(&mut rng)?;
        let optimizer = self.resolve_optimizer(spec.optimizer);

        info!(
            "built contractive autoencoder: n_visible={} n_hidden={} batch_size={} params={}",
            model.n_visible(),
            model.n_hidden(),
            model.batch_size(),
            model.size()
        );

        Ok(Session {
            model,
            params,
            optimizer,
            rng,
        })
    }

    fn resolve_optimizer(&self, spec: OptimizerSpec) -> GradientDescent {
        match spec {
            OptimizerSpec::GradientDescent { learning_rate } => GradientDescent::new(learning_rate),
        }
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn spec(seed: Option<u64>) -> TrainerSpec {
        TrainerSpec {
            model: ModelSpec {
                n_visible: 5,
                n_hidden: 3,
                batch_size: NonZeroUsize::new(2).unwrap(),
            },
            optimizer: OptimizerSpec::GradientDescent { learning_rate: 0.1 },
            contraction_level: 0.1,
            steps: NonZeroUsize::new(1).unwrap(),
            seed,
        }
    }

    #[test]
    fn build_follows_the_spec() {
        let session = AutoencoderBuilder::new().build(&spec(Some(1))).unwrap();

        assert_eq!(session.model.n_visible(), 5);
        assert_eq!(session.model.n_hidden(), 3);
        assert_eq!(session.model.batch_size(), 2);
        assert_eq!(session.params.len(), session.model.size());
        assert_eq!(session.optimizer.learning_rate(), 0.1);
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let builder = AutoencoderBuilder::new();
        let a = builder.build(&spec(Some(42))).unwrap();
        let b = builder.build(&spec(Some(42))).unwrap();

        assert_eq!(a.params, b.params);
    }
}
