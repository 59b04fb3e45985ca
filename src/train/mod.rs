pub mod epoch_stats;
pub mod loop_fn;
pub mod report;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use loop_fn::train_loop;
pub use report::{StopReason, TrainingReport};
pub use train_config::TrainConfig;
pub use trainer::train_and_save;
