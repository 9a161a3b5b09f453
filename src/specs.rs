use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// The specification for the `ContractiveAutoencoder` struct.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelSpec {
    pub n_visible: usize,
    pub n_hidden: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: NonZeroUsize,
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    GradientDescent { learning_rate: f64 },
}

/// The specification for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    pub optimizer: OptimizerSpec,
    pub contraction_level: f64,
    pub steps: NonZeroUsize,
    pub seed: Option<u64>,
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_trainer_spec() {
        let json = r#"{
            "model": { "n_visible": 4, "n_hidden": 2 },
            "optimizer": { "gradient_descent": { "learning_rate": 0.1 } },
            "contraction_level": 0.1,
            "steps": 10,
            "seed": 42
        }"#;

        let spec: TrainerSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.model.n_visible, 4);
        assert_eq!(spec.model.n_hidden, 2);
        assert_eq!(spec.model.batch_size.get(), 1);
        assert_eq!(spec.steps.get(), 10);
        assert_eq!(spec.seed, Some(42));

        let OptimizerSpec::GradientDescent { learning_rate } = spec.optimizer;
        assert_eq!(learning_rate, 0.1);
    }

    #[test]
    fn zero_steps_are_rejected() {
        let json = r#"{
            "model": { "n_visible": 4, "n_hidden": 2, "batch_size": 3 },
            "optimizer": { "gradient_descent": { "learning_rate": 0.1 } },
            "contraction_level": 0.1,
            "steps": 0,
            "seed": null
        }"#;

        assert!(serde_json::from_str::<TrainerSpec>(json).is_err());
    }
}
