pub mod activation;
pub mod cost;
pub mod data;
pub mod error;
pub mod eval;
pub mod layers;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::Activation;
pub use cost::CostKind;
pub use data::{Dataset, Exemplar};
pub use error::NetError;
pub use eval::{execute, validate, ClassRule, ConfusionMatrix};
pub use layers::Layer;
pub use math::matrix::Matrix;
pub use network::{LayerSpec, Network, NetworkSpec};
pub use train::{train_and_save, train_loop, EpochStats, StopReason, TrainConfig, TrainingReport};
