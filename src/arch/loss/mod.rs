pub mod contraction;
mod cross_entropy;
mod loss_fn;

pub use cross_entropy::CrossEntropy;
pub use loss_fn::LossFn;
