use serde::{Deserialize, Serialize};

use crate::train::epoch_stats::EpochStats;

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Mean-loss improvement stayed below the convergence threshold for
    /// `patience` consecutive epochs.
    Converged,
    /// The epoch ceiling was reached.
    EpochLimit,
    /// The stop flag was raised or the progress receiver went away; the
    /// loop exited at an epoch boundary.
    Stopped,
}

/// Outcome of a training run. The loop's internal bookkeeping (epoch
/// index, stall counter) is discarded; this and the mutated network are
/// what survive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Completed epochs.
    pub epochs_run: usize,
    /// Mean training loss of the last completed epoch.
    pub final_loss: f64,
    /// Best mean training loss seen in any epoch.
    pub best_loss: f64,
    pub stop_reason: StopReason,
    /// One entry per completed epoch, in order.
    pub history: Vec<EpochStats>,
}
