use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::{softmax, Activation};
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Values a forward pass must retain for the matching backward pass: the
/// layer input and the pre-activation row `z = x·W + b`.
///
/// Opaque to callers; `Layer::forward` produces one and `Layer::backward`
/// consumes it, so a backward pass without a preceding forward pass is
/// unrepresentable.
#[derive(Debug, Clone)]
pub struct ForwardCache {
    input: Matrix,
    pre_activation: Matrix,
}

#[derive(Debug, Clone)]
struct PendingGradients {
    weights: Matrix,
    biases: Matrix,
}

/// One dense transformation `y = activation(x·W + b)` under the
/// row-vector convention: `W` is `input_size × size`, `b` is `1 × size`.
///
/// Weight and bias dimensions are fixed at construction; only their
/// values change during training. Momentum history (the previously
/// applied update step) is layer-local state, zeroed on construction and
/// not persisted, so independent networks never share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    size: usize,
    input_size: usize,
    weights: Matrix,
    biases: Matrix,
    activation: Activation,
    #[serde(skip)]
    pending: Option<PendingGradients>,
    #[serde(skip)]
    velocity: Option<(Matrix, Matrix)>,
}

impl Layer {
    /// Creates a layer with freshly initialized weights: He for the
    /// ReLU family, Xavier otherwise.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Layer {
        let weights = match activation {
            Activation::Relu | Activation::LeakyRelu { .. } => {
                Matrix::he(input_size, size, rng)
            }
            _ => Matrix::xavier(input_size, size, rng),
        };
        let biases = Matrix::zeros(1, size);

        Layer {
            size,
            input_size,
            weights,
            biases,
            activation,
            pending: None,
            velocity: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Computes `activation(x·W + b)` and the cache the backward pass
    /// needs. Fails with `DimensionMismatch` if `input` is not
    /// `input_size` long.
    pub fn forward(&self, input: &[f64]) -> Result<(Vec<f64>, ForwardCache)> {
        if input.len() != self.input_size {
            return Err(NetError::DimensionMismatch {
                what: "layer input",
                expected: self.input_size,
                actual: input.len(),
            });
        }

        let x = Matrix::row_vector(input);
        let z = &x.matmul(&self.weights) + &self.biases;
        let output = if self.activation.is_vector_valued() {
            softmax(z.row(0))
        } else {
            z.row(0).iter().map(|&v| self.activation.apply(v)).collect()
        };

        let cache = ForwardCache {
            input: x,
            pre_activation: z,
        };
        Ok((output, cache))
    }

    /// Consumes a forward cache and the loss gradient with respect to this
    /// layer's output; stores the weight and bias gradients for
    /// `apply_update` and returns the gradient with respect to the input,
    /// to be fed to the previous layer.
    ///
    /// δ = output_gradient ⊙ activation'(z); dW = inputᵀ·δ; db = δ;
    /// input gradient = δ·Wᵀ.
    pub fn backward(&mut self, cache: &ForwardCache, output_gradient: &[f64]) -> Result<Vec<f64>> {
        if output_gradient.len() != self.size {
            return Err(NetError::DimensionMismatch {
                what: "layer output gradient",
                expected: self.size,
                actual: output_gradient.len(),
            });
        }
        if cache.pre_activation.cols() != self.size || cache.input.cols() != self.input_size {
            return Err(NetError::DimensionMismatch {
                what: "forward cache",
                expected: self.size,
                actual: cache.pre_activation.cols(),
            });
        }

        let derivative = cache.pre_activation.map(|z| self.activation.derivative(z));
        let delta = Matrix::row_vector(output_gradient).hadamard(&derivative);

        let input_gradient = delta.matmul(&self.weights.transpose());
        let weight_gradient = Matrix::outer(cache.input.row(0), delta.row(0));

        self.pending = Some(PendingGradients {
            weights: weight_gradient,
            biases: delta,
        });

        Ok(input_gradient.row(0).to_vec())
    }

    /// Applies the gradients stored by the last `backward` call:
    /// `step = lr·gradient + momentum·previous_step`, subtracted from the
    /// weights and biases. The applied step becomes the next momentum
    /// term. Fails with `UninitializedState` when no backward pass has
    /// produced gradients since the last update.
    pub fn apply_update(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        let pending = self.pending.take().ok_or(NetError::UninitializedState(
            "apply_update called without a completed backward pass",
        ))?;

        let (prev_w, prev_b) = self.velocity.take().unwrap_or_else(|| {
            (
                Matrix::zeros(self.input_size, self.size),
                Matrix::zeros(1, self.size),
            )
        });

        let step_w = &pending.weights.scale(learning_rate) + &prev_w.scale(momentum);
        let step_b = &pending.biases.scale(learning_rate) + &prev_b.scale(momentum);

        self.weights = &self.weights - &step_w;
        self.biases = &self.biases - &step_b;
        self.velocity = Some((step_w, step_b));

        Ok(())
    }

    /// Structural consistency of a deserialized layer.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.size == 0 || self.input_size == 0 {
            return Err(format!(
                "layer has degenerate shape {}x{}",
                self.input_size, self.size
            ));
        }
        if !self.weights.is_consistent() || !self.biases.is_consistent() {
            return Err("weight or bias buffer disagrees with its declared shape".to_string());
        }
        if self.weights.rows() != self.input_size || self.weights.cols() != self.size {
            return Err(format!(
                "weight matrix is {}x{}, expected {}x{}",
                self.weights.rows(),
                self.weights.cols(),
                self.input_size,
                self.size
            ));
        }
        if self.biases.rows() != 1 || self.biases.cols() != self.size {
            return Err(format!(
                "bias vector is {}x{}, expected 1x{}",
                self.biases.rows(),
                self.biases.cols(),
                self.size
            ));
        }
        if !self.weights.is_finite() || !self.biases.is_finite() {
            return Err("non-finite weight or bias value".to_string());
        }
        Ok(())
    }
}
