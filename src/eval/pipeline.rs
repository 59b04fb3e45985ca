use log::info;
use serde::{Deserialize, Serialize};

use crate::data::exemplar::Dataset;
use crate::error::{NetError, Result};
use crate::eval::confusion::ConfusionMatrix;
use crate::network::network::Network;

/// How a continuous output vector is binned into a discrete class. The
/// same rule maps both the prediction and the target, so the two sides of
/// the confusion matrix are always comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassRule {
    /// Class = index of the largest component. The usual rule for one-hot
    /// targets.
    ArgMax,
    /// For single-output networks: class 1 iff the output is at least the
    /// threshold, else class 0.
    Threshold(f64),
}

impl ClassRule {
    /// Number of classes this rule produces for an `output_dim`-wide
    /// vector.
    pub fn class_count(&self, output_dim: usize) -> usize {
        match self {
            ClassRule::ArgMax => output_dim,
            ClassRule::Threshold(_) => 2,
        }
    }

    pub fn class_of(&self, vector: &[f64]) -> usize {
        match self {
            ClassRule::ArgMax => argmax(vector),
            ClassRule::Threshold(t) => {
                if vector[0] >= *t {
                    1
                } else {
                    0
                }
            }
        }
    }
}

/// Index of the maximum element in a slice.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Runs inference over every exemplar, bins each prediction and target
/// through `rule`, and accumulates the results into a confusion matrix.
/// The sum of all matrix cells equals `dataset.len()`.
///
/// Fails with `EmptyDataset` before touching the network when there is
/// nothing to validate, and with `DimensionMismatch` when the dataset's
/// target width does not match the network's output.
pub fn validate(network: &Network, dataset: &Dataset, rule: ClassRule) -> Result<ConfusionMatrix> {
    if dataset.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    if dataset.n_output() != network.output_size() {
        return Err(NetError::DimensionMismatch {
            what: "dataset target width",
            expected: network.output_size(),
            actual: dataset.n_output(),
        });
    }
    if matches!(rule, ClassRule::Threshold(_)) && network.output_size() != 1 {
        return Err(NetError::InvalidConfig(
            "threshold rule applies only to single-output networks".into(),
        ));
    }

    let mut matrix = ConfusionMatrix::new(rule.class_count(network.output_size()));
    for exemplar in dataset {
        let output = network.predict(exemplar.input())?;
        let predicted = rule.class_of(&output);
        let actual = rule.class_of(exemplar.target());
        matrix.record(actual, predicted)?;
    }

    info!(
        "validated {} exemplars, accuracy {:.4}",
        matrix.total(),
        matrix.accuracy()
    );
    Ok(matrix)
}

/// Inference-only pass over a dataset: no class mapping, no matrix.
///
/// The value is lazy and restartable: each `run` call is a fresh pass
/// yielding one output vector per exemplar, in dataset order.
pub struct Execution<'a> {
    network: &'a Network,
    dataset: &'a Dataset,
}

impl<'a> Execution<'a> {
    pub fn run(&self) -> impl Iterator<Item = Result<Vec<f64>>> + 'a {
        let network = self.network;
        self.dataset.iter().map(move |ex| network.predict(ex.input()))
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }
}

/// The "execute" command surface.
pub fn execute<'a>(network: &'a Network, dataset: &'a Dataset) -> Execution<'a> {
    Execution { network, dataset }
}
