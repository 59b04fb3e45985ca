/// Squared-error cost for regression-style targets.
pub struct MseCost;

impl MseCost {
    /// Scalar MSE: mean((output - target)²)
    pub fn loss(output: &[f64], target: &[f64]) -> f64 {
        let n = output.len() as f64;
        output
            .iter()
            .zip(target.iter())
            .map(|(o, t)| (o - t).powi(2))
            .sum::<f64>()
            / n
    }

    /// Per-output gradient: output - target
    pub fn gradient(output: &[f64], target: &[f64]) -> Vec<f64> {
        output.iter().zip(target.iter()).map(|(o, t)| o - t).collect()
    }
}
