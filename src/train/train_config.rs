use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

use crate::error::{NetError, Result};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run. Every knob is an explicit field;
/// `new` fills the ones it does not take with the stated neutral values.
///
/// - `epochs`                — epoch ceiling (at least 1)
/// - `learning_rate`         — gradient step scale, positive
/// - `momentum`              — fraction of the previous step reapplied, in [0, 1)
/// - `convergence_threshold` — minimum mean-loss improvement per epoch to
///                             count as progress; `0.0` disables early
///                             stopping
/// - `patience`              — consecutive sub-threshold epochs before the
///                             loop stops as converged (at least 1)
/// - `shuffle`               — reorder exemplars before each epoch
/// - `validation_split`      — trailing fraction of the dataset held out
///                             for per-epoch validation loss, in [0, 1)
/// - `seed`                  — RNG seed for shuffling; `None` draws from
///                             the thread's entropy source
/// - `progress_tx`           — optional channel receiving one `EpochStats`
///                             per completed epoch; a dropped receiver
///                             stops the loop at the next epoch boundary
/// - `stop_flag`             — optional flag polled at epoch boundaries,
///                             the only safe preemption points
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub convergence_threshold: f64,
    pub patience: usize,
    pub shuffle: bool,
    pub validation_split: f64,
    pub seed: Option<u64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// A minimal config: shuffling on, early stopping disabled, no
    /// validation split, entropy-seeded shuffle order, no progress
    /// channel, no stop flag.
    pub fn new(epochs: usize, learning_rate: f64, momentum: f64) -> TrainConfig {
        TrainConfig {
            epochs,
            learning_rate,
            momentum,
            convergence_threshold: 0.0,
            patience: 1,
            shuffle: true,
            validation_split: 0.0,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetError::InvalidConfig("epoch count must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(
                "learning rate must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(NetError::InvalidConfig("momentum must be in [0, 1)".into()));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold >= 0.0) {
            return Err(NetError::InvalidConfig(
                "convergence threshold must be non-negative".into(),
            ));
        }
        if self.patience == 0 {
            return Err(NetError::InvalidConfig("patience must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(NetError::InvalidConfig(
                "validation split must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}
