use std::{env, fs};

use anyhow::{Context, bail};
use contractive_autoencoder::{AutoencoderBuilder, builder::Session, specs::TrainerSpec};
use log::info;
use ndarray::Array2;
use rand::Rng;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        bail!("usage: contractive_autoencoder <spec.json>");
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let spec: TrainerSpec =
        serde_json::from_str(&raw).with_context(|| format!("invalid spec in {path}"))?;

    let Session {
        model,
        mut params,
        mut optimizer,
        mut rng,
    } = AutoencoderBuilder::new().build(&spec)?;

    // A synthetic batch stands in for a real data loader.
    let x = Array2::from_shape_fn((model.batch_size(), model.n_visible()), |_| {
        rng.random::<f64>()
    });

    let mut manager = model.param_manager(&mut params)?;
    let mut loss = f64::NAN;

    for _ in 0..spec.steps.get() {
        loss = model.step_with(
            &mut manager,
            x.view(),
            spec.contraction_level,
            &mut optimizer,
        )?;
    }

    info!(steps = spec.steps.get(), loss = loss; "training finished");
    Ok(())
}
