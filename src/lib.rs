pub mod arch;
pub mod builder;
pub mod error;
pub mod initialization;
pub mod optimization;
pub mod specs;

pub use arch::ContractiveAutoencoder;
pub use builder::AutoencoderBuilder;
pub use error::{CaErr, Result};
