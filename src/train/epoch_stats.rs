use serde::{Deserialize, Serialize};

/// Per-epoch training statistics.
///
/// When a `progress_tx` channel is configured, the training loop sends
/// one of these at the end of every completed epoch; they also accumulate
/// in the final `TrainingReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Epoch ceiling for this run.
    pub total_epochs: usize,
    /// Mean training loss over all exemplars in this epoch.
    pub train_loss: f64,
    /// Mean loss over the held-out split, if one was configured.
    pub val_loss: Option<f64>,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
