use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::cost::CostKind;
use crate::data::exemplar::Exemplar;
use crate::error::{NetError, Result};
use crate::layers::dense::{ForwardCache, Layer};

/// An ordered stack of dense layers with the hyperparameters that drive
/// their updates.
///
/// Invariant, checked at construction and again when loading a persisted
/// model: the layer list is non-empty and every layer's output size
/// equals the next layer's input size. The first input size and last
/// output size are the network's public dimensions.
///
/// `train_one` takes `&mut self`; overlapping training cycles on one
/// network do not compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Layer>,
    cost: CostKind,
    learning_rate: f64,
    momentum: f64,
}

impl Network {
    pub fn new(
        layers: Vec<Layer>,
        cost: CostKind,
        learning_rate: f64,
        momentum: f64,
    ) -> Result<Network> {
        let network = Network {
            layers,
            cost,
            learning_rate,
            momentum,
        };
        network.check_structure().map_err(NetError::InvalidConfig)?;
        Ok(network)
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    pub fn cost(&self) -> CostKind {
        self.cost
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Replaces the hyperparameters for a training run.
    pub fn set_hyperparameters(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(
                "learning rate must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&momentum) {
            return Err(NetError::InvalidConfig("momentum must be in [0, 1)".into()));
        }
        self.learning_rate = learning_rate;
        self.momentum = momentum;
        Ok(())
    }

    /// Pure inference: runs the forward pass through every layer and
    /// returns the final output. No weights or caches are touched.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            let (output, _) = layer.forward(&current)?;
            current = output;
        }
        Ok(current)
    }

    /// Forward pass that keeps each layer's cache so a backward pass can
    /// follow. The caches come back in layer order.
    pub fn forward_trace(&self, input: &[f64]) -> Result<(Vec<f64>, Vec<ForwardCache>)> {
        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = input.to_vec();
        for layer in &self.layers {
            let (output, cache) = layer.forward(&current)?;
            caches.push(cache);
            current = output;
        }
        Ok((current, caches))
    }

    /// Scalar loss of one exemplar without touching any weights.
    pub fn evaluate(&self, exemplar: &Exemplar) -> Result<f64> {
        self.check_target(exemplar.target())?;
        let output = self.predict(exemplar.input())?;
        Ok(self.cost.loss(&output, exemplar.target()))
    }

    /// One full training cycle on a single exemplar: forward pass, loss
    /// and output gradient, backward pass in reverse layer order feeding
    /// each returned input gradient upstream, then a coordinated weight
    /// update on every layer. Returns the scalar loss before the update.
    pub fn train_one(&mut self, exemplar: &Exemplar) -> Result<f64> {
        self.check_target(exemplar.target())?;

        let (output, caches) = self.forward_trace(exemplar.input())?;
        let loss = self.cost.loss(&output, exemplar.target());

        let mut gradient = self.cost.gradient(&output, exemplar.target());
        for (layer, cache) in self.layers.iter_mut().zip(caches.iter()).rev() {
            gradient = layer.backward(cache, &gradient)?;
        }

        for layer in &mut self.layers {
            layer.apply_update(self.learning_rate, self.momentum)?;
        }

        Ok(loss)
    }

    /// Serializes the full network (layer dimensions, activation tags,
    /// weights, biases, cost tag, and hyperparameters) as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        info!("saved network to {}", path.as_ref().display());
        Ok(())
    }

    /// Deserializes a network and re-validates its structure. A payload
    /// with an inconsistent dimension chain, malformed weight shapes, an
    /// unknown activation or cost tag, or out-of-range hyperparameters is
    /// rejected as `CorruptModel`; nothing partial is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)
            .map_err(|e| NetError::CorruptModel(e.to_string()))?;
        network.check_structure().map_err(NetError::CorruptModel)?;
        info!("loaded network from {}", path.as_ref().display());
        Ok(network)
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(NetError::DimensionMismatch {
                what: "exemplar target",
                expected: self.output_size(),
                actual: target.len(),
            });
        }
        Ok(())
    }

    fn check_structure(&self) -> std::result::Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size() != pair[1].input_size() {
                return Err(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].size(),
                    i + 1,
                    pair[1].input_size()
                ));
            }
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if let Err(reason) = layer.validate() {
                return Err(format!("layer {}: {}", i, reason));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err("learning rate must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err("momentum must be in [0, 1)".to_string());
        }
        Ok(())
    }
}
