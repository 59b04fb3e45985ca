use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::exemplar::{Dataset, Exemplar};
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::report::{StopReason, TrainingReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` on `dataset` under `config` and returns a
/// `TrainingReport`; the network is modified in place.
///
/// Per epoch: the training exemplars are reshuffled when configured, each
/// one drives a full `train_one` cycle, and the accumulated mean loss is
/// compared against the best epoch so far. When the improvement stays
/// below `convergence_threshold` for `patience` consecutive epochs the
/// loop stops as `Converged`; otherwise it runs to the epoch ceiling.
/// A trailing `validation_split` fraction of the dataset is held out of
/// training and scored after every epoch.
///
/// Fails before any epoch runs when the dataset is empty (or the split
/// leaves no training exemplars) or the configuration is out of range.
pub fn train_loop(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<TrainingReport> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    network.set_hyperparameters(config.learning_rate, config.momentum)?;

    let n_holdout = (dataset.len() as f64 * config.validation_split).floor() as usize;
    let n_train = dataset.len() - n_holdout;
    if n_train == 0 {
        return Err(NetError::EmptyDataset);
    }

    // Exemplars are referenced, never copied; only the order moves.
    let mut train_set: Vec<&Exemplar> = dataset.iter().take(n_train).collect();
    let holdout: Vec<&Exemplar> = dataset.iter().skip(n_train).collect();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut best_loss = f64::INFINITY;
    let mut stall = 0usize;
    let mut final_loss = 0.0;
    let mut history: Vec<EpochStats> = Vec::new();
    let mut stop_reason = StopReason::EpochLimit;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            stop_reason = StopReason::Stopped;
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            train_set.shuffle(&mut rng);
        }

        let mut total_loss = 0.0;
        for exemplar in &train_set {
            total_loss += network.train_one(exemplar)?;
        }
        let train_loss = total_loss / n_train as f64;
        final_loss = train_loss;

        if !train_loss.is_finite() {
            warn!("epoch {}: training loss is not finite", epoch);
        }

        let val_loss = if holdout.is_empty() {
            None
        } else {
            Some(mean_eval_loss(network, &holdout)?)
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            "epoch {}/{}: train loss {:.6}{}",
            epoch,
            config.epochs,
            train_loss,
            match val_loss {
                Some(v) => format!(", val loss {:.6}", v),
                None => String::new(),
            }
        );

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats.clone()).is_err() {
                history.push(stats);
                stop_reason = StopReason::Stopped;
                break;
            }
        }
        history.push(stats);

        // Convergence rule: an epoch whose improvement over the best loss
        // falls short of the threshold counts toward the stall run.
        if config.convergence_threshold > 0.0 {
            let improvement = best_loss - train_loss;
            if improvement < config.convergence_threshold {
                stall += 1;
                if stall >= config.patience {
                    info!(
                        "converged after {} epochs (best loss {:.6})",
                        epoch,
                        best_loss.min(train_loss)
                    );
                    if train_loss < best_loss {
                        best_loss = train_loss;
                    }
                    stop_reason = StopReason::Converged;
                    break;
                }
            } else {
                stall = 0;
            }
        }
        if train_loss < best_loss {
            best_loss = train_loss;
        }
    }

    if best_loss.is_infinite() {
        best_loss = final_loss;
    }

    Ok(TrainingReport {
        epochs_run: history.len(),
        final_loss,
        best_loss,
        stop_reason,
        history,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}

/// Mean loss over a slice of exemplars without gradient work.
fn mean_eval_loss(network: &Network, exemplars: &[&Exemplar]) -> Result<f64> {
    let mut total = 0.0;
    for exemplar in exemplars {
        total += network.evaluate(exemplar)?;
    }
    Ok(total / exemplars.len() as f64)
}
