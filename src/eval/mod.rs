pub mod confusion;
pub mod pipeline;

pub use confusion::ConfusionMatrix;
pub use pipeline::{execute, validate, ClassRule, Execution};
