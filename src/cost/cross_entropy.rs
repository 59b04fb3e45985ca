/// Categorical cross-entropy cost for classification targets, paired with
/// a Softmax output layer.
pub struct CrossEntropyCost;

/// Added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyCost {
    /// Scalar cross-entropy: -sum(target[i] * log(output[i] + eps))
    ///
    /// `output` — softmax probabilities, `target` — one-hot (or soft)
    /// target distribution.
    pub fn loss(output: &[f64], target: &[f64]) -> f64 {
        output
            .iter()
            .zip(target.iter())
            .map(|(o, t)| -t * (o + EPS).ln())
            .sum()
    }

    /// Gradient of the combined Softmax + cross-entropy with respect to
    /// the pre-softmax logits:
    ///   ∂L/∂z_i = output[i] - target[i]
    ///
    /// The Softmax activation's element-wise derivative is `1.0`, so this
    /// combined form passes through the backward pass unchanged.
    pub fn gradient(output: &[f64], target: &[f64]) -> Vec<f64> {
        output.iter().zip(target.iter()).map(|(o, t)| o - t).collect()
    }
}
