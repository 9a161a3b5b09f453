pub mod activations;
mod autoencoder;
pub mod loss;
mod params;

pub use autoencoder::{ContractiveAutoencoder, Gradients};
pub use params::{ParamKind, ParamManager, ParamView};
