use serde::{Deserialize, Serialize};

use crate::cost::cross_entropy::CrossEntropyCost;
use crate::cost::mse::MseCost;

/// Selects the cost function a network trains against.
///
/// - `Mse`          — squared error; pair with Linear or Sigmoid output.
/// - `CrossEntropy` — categorical cross-entropy; pair with Softmax output.
///   Its gradient is the combined Softmax+CE form (`output - target`).
///
/// Chosen at network construction; persisted alongside the weights. An
/// unrecognized tag in a stored model fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    Mse,
    CrossEntropy,
}

impl CostKind {
    /// Scalar loss for one exemplar.
    pub fn loss(&self, output: &[f64], target: &[f64]) -> f64 {
        match self {
            CostKind::Mse => MseCost::loss(output, target),
            CostKind::CrossEntropy => CrossEntropyCost::loss(output, target),
        }
    }

    /// Gradient of the loss with respect to the network output.
    pub fn gradient(&self, output: &[f64], target: &[f64]) -> Vec<f64> {
        match self {
            CostKind::Mse => MseCost::gradient(output, target),
            CostKind::CrossEntropy => CrossEntropyCost::gradient(output, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_of_identical_vectors_is_zero() {
        let y = [0.3, -1.7, 2.5, 0.0];
        assert_eq!(CostKind::Mse.loss(&y, &y), 0.0);
        assert!(CostKind::Mse.gradient(&y, &y).iter().all(|&g| g == 0.0));
    }

    #[test]
    fn cross_entropy_of_matching_one_hot_is_zero() {
        let y = [0.0, 1.0, 0.0];
        assert!(CostKind::CrossEntropy.loss(&y, &y).abs() < 1e-9);
        assert!(CostKind::CrossEntropy
            .gradient(&y, &y)
            .iter()
            .all(|&g| g == 0.0));
    }

    #[test]
    fn mse_penalizes_distance() {
        let out = [1.0, 0.0];
        let tgt = [0.0, 0.0];
        assert!((CostKind::Mse.loss(&out, &tgt) - 0.5).abs() < 1e-12);
        assert_eq!(CostKind::Mse.gradient(&out, &tgt), vec![1.0, 0.0]);
    }

    #[test]
    fn cross_entropy_gradient_is_output_minus_target() {
        let out = [0.7, 0.2, 0.1];
        let tgt = [1.0, 0.0, 0.0];
        let g = CostKind::CrossEntropy.gradient(&out, &tgt);
        assert!((g[0] + 0.3).abs() < 1e-12);
        assert!((g[1] - 0.2).abs() < 1e-12);
        assert!((g[2] - 0.1).abs() < 1e-12);
    }
}
