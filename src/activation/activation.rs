use serde::{Deserialize, Serialize};

/// Activation function applied by a dense layer.
///
/// A closed set of tagged variants; each layer stores one tag, and a new
/// activation needs only an entry here, with no layer or network changes.
/// Every function is pure and finite for all finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Linear,
    Relu,
    LeakyRelu { alpha: f64 },
    /// Softmax is vector-valued; it is applied across a full output row in
    /// `Layer::forward`, not element-wise. Its element-wise `derivative()`
    /// is `1.0` so the combined softmax + cross-entropy gradient
    /// (`output - target`) is not double-applied during backprop.
    Softmax,
}

impl Activation {
    /// Element-wise activation of a pre-activation value.
    pub fn apply(&self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Activation::Tanh => z.tanh(),
            Activation::Linear => z,
            Activation::Relu => {
                if z > 0.0 {
                    z
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu { alpha } => {
                if z > 0.0 {
                    z
                } else {
                    alpha * z
                }
            }
            Activation::Softmax => {
                panic!(
                    "Activation::Softmax cannot be applied element-wise; \
                     Layer::forward applies the full-row softmax"
                )
            }
        }
    }

    /// Element-wise derivative, evaluated at the pre-activation value.
    pub fn derivative(&self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let s = self.apply(z);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            Activation::Linear => 1.0,
            Activation::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu { alpha } => {
                if z > 0.0 {
                    1.0
                } else {
                    *alpha
                }
            }
            Activation::Softmax => 1.0,
        }
    }

    /// Whether the whole output row is activated at once.
    pub fn is_vector_valued(&self) -> bool {
        matches!(self, Activation::Softmax)
    }
}

/// Numerically stable softmax over one row: exponentials are shifted by
/// the row maximum before normalizing.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_saturates_without_nan() {
        for z in [-1e3, -10.0, 0.0, 10.0, 1e3] {
            let a = Activation::Sigmoid.apply(z);
            assert!(a.is_finite());
            assert!((0.0..=1.0).contains(&a));
        }
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn tanh_derivative_matches_identity() {
        for z in [-2.0f64, -0.5, 0.0, 0.7, 3.0] {
            let t = z.tanh();
            let d = Activation::Tanh.derivative(z);
            assert!((d - (1.0 - t * t)).abs() < 1e-12);
        }
    }

    #[test]
    fn linear_is_identity_with_unit_gradient() {
        assert_eq!(Activation::Linear.apply(3.25), 3.25);
        assert_eq!(Activation::Linear.derivative(-17.0), 1.0);
    }

    #[test]
    fn relu_clamps_negative_input() {
        assert_eq!(Activation::Relu.apply(-4.0), 0.0);
        assert_eq!(Activation::Relu.apply(4.0), 4.0);
        assert_eq!(Activation::Relu.derivative(-4.0), 0.0);
        assert_eq!(Activation::Relu.derivative(4.0), 1.0);
    }

    #[test]
    fn leaky_relu_keeps_negative_slope() {
        let act = Activation::LeakyRelu { alpha: 0.01 };
        assert!((act.apply(-2.0) + 0.02).abs() < 1e-12);
        assert_eq!(act.derivative(-2.0), 0.01);
    }

    #[test]
    fn softmax_sums_to_one_under_large_logits() {
        let p = softmax(&[1000.0, 1001.0, 999.0]);
        let sum: f64 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(p.iter().all(|v| v.is_finite()));
        assert!(p[1] > p[0] && p[0] > p[2]);
    }
}
