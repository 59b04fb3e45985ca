use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::cost::CostKind;
use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// - `size`       — number of nodes in this layer
/// - `input_size` — nodes feeding into it (the previous layer's `size`,
///                  or the raw input dimension for the first layer)
/// - `activation` — activation applied after the linear transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Activation,
}

/// The "make network" surface: a fully serializable description of an
/// architecture plus its cost function and hyperparameters, buildable
/// into an initialized, untrained `Network`.
///
/// A spec can be saved to and loaded from JSON independently of trained
/// weights, so architectures can be stored before training starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used as a model file stem by callers.
    pub name: String,
    /// Ordered layer descriptions, input to output.
    pub layers: Vec<LayerSpec>,
    pub cost: CostKind,
    pub learning_rate: f64,
    pub momentum: f64,
}

impl NetworkSpec {
    /// A spec whose hidden-layer sizes taper geometrically from
    /// `n_in · n_out` down to `n_out` across `n_layers` layers. All
    /// hidden layers use `hidden`, the last layer uses `output`.
    pub fn tapered(
        name: &str,
        n_in: usize,
        n_out: usize,
        n_layers: usize,
        hidden: Activation,
        output: Activation,
        cost: CostKind,
        learning_rate: f64,
        momentum: f64,
    ) -> NetworkSpec {
        let sizes = tapered_sizes(n_in, n_out, n_layers);
        let mut layers = Vec::with_capacity(sizes.len());
        let mut prev = n_in;
        for (i, &size) in sizes.iter().enumerate() {
            let activation = if i + 1 == sizes.len() { output } else { hidden };
            layers.push(LayerSpec {
                size,
                input_size: prev,
                activation,
            });
            prev = size;
        }
        NetworkSpec {
            name: name.to_string(),
            layers,
            cost,
            learning_rate,
            momentum,
        }
    }

    /// Validates the chain and hyperparameters, then builds a network
    /// with freshly initialized weights.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        if self.layers.is_empty() {
            return Err(NetError::InvalidConfig(
                "network spec declares no layers".into(),
            ));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size {
                return Err(NetError::InvalidConfig(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].size,
                    i + 1,
                    pair[1].input_size
                )));
            }
        }

        let layers = self
            .layers
            .iter()
            .map(|spec| Layer::new(spec.size, spec.input_size, spec.activation, rng))
            .collect();
        Network::new(layers, self.cost, self.learning_rate, self.momentum)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a spec from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let spec = serde_json::from_reader(reader)
            .map_err(|e| NetError::CorruptModel(e.to_string()))?;
        Ok(spec)
    }
}

/// Interpolated node counts between `n_in · n_out` and `n_out`:
/// `y(x) = (x·(n·y2 - y1) + y1·(n - 1)) / ((x + 1)·(n - 1))` rounded to
/// the nearest integer, with the final layer pinned to `n_out`.
fn tapered_sizes(n_in: usize, n_out: usize, n_layers: usize) -> Vec<usize> {
    if n_layers <= 1 {
        return vec![n_out];
    }
    let y1 = (n_in * n_out) as f64;
    let y2 = n_out as f64;
    let n = n_layers as f64;
    let mut sizes: Vec<usize> = (0..n_layers)
        .map(|i| {
            let x = i as f64;
            let y = (x * (n * y2 - y1) + y1 * (n - 1.0)) / ((x + 1.0) * (n - 1.0));
            (y + 0.5).floor().max(1.0) as usize
        })
        .collect();
    sizes[n_layers - 1] = n_out;
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tapered_sizes_start_wide_and_end_at_output() {
        let sizes = tapered_sizes(4, 2, 3);
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes[0], 8);
        assert_eq!(sizes[2], 2);
        assert!(sizes[0] >= sizes[1] && sizes[1] >= sizes[2]);
    }

    #[test]
    fn build_rejects_mismatched_chain() {
        let spec = NetworkSpec {
            name: "broken".to_string(),
            layers: vec![
                LayerSpec {
                    size: 3,
                    input_size: 2,
                    activation: Activation::Sigmoid,
                },
                LayerSpec {
                    size: 1,
                    input_size: 4,
                    activation: Activation::Sigmoid,
                },
            ],
            cost: CostKind::Mse,
            learning_rate: 0.1,
            momentum: 0.0,
        };
        assert!(matches!(
            spec.build(&mut rand::thread_rng()),
            Err(NetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn built_network_exposes_spec_dimensions() {
        let spec = NetworkSpec::tapered(
            "t",
            4,
            2,
            3,
            Activation::Tanh,
            Activation::Softmax,
            CostKind::CrossEntropy,
            0.05,
            0.5,
        );
        let network = spec.build(&mut rand::thread_rng()).unwrap();
        assert_eq!(network.input_size(), 4);
        assert_eq!(network.output_size(), 2);
        assert_eq!(network.layer_count(), 3);
        assert_eq!(network.cost(), CostKind::CrossEntropy);
    }
}
