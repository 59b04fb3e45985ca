use std::path::Path;

use log::info;

use crate::data::exemplar::Dataset;
use crate::error::Result;
use crate::network::network::Network;
use crate::train::loop_fn::train_loop;
use crate::train::report::TrainingReport;
use crate::train::train_config::TrainConfig;

/// The "train" command surface: runs the training loop and then persists
/// the network to `path` regardless of whether the loop converged, hit
/// the epoch ceiling, or was stopped at an epoch boundary.
///
/// Configuration failures surface before any epoch runs and nothing is
/// written.
pub fn train_and_save<P: AsRef<Path>>(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    path: P,
) -> Result<TrainingReport> {
    let report = train_loop(network, dataset, config)?;
    info!(
        "training ended after {} epochs ({:?}), final loss {:.6}",
        report.epochs_run, report.stop_reason, report.final_loss
    );
    network.save(path)?;
    Ok(report)
}
