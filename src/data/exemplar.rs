use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// One labeled sample: an input vector and its target vector. Immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    input: Vec<f64>,
    target: Vec<f64>,
}

impl Exemplar {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Exemplar {
        Exemplar { input, target }
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }
}

/// An ordered collection of exemplars sharing one input dimensionality
/// and one target dimensionality.
///
/// Built once from an already-parsed source (file parsing is a
/// collaborator's job); optionally reshuffled in place between epochs.
/// Training and validation iterate it by reference; exemplars are never
/// copied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    exemplars: Vec<Exemplar>,
    n_input: usize,
    n_output: usize,
}

impl Dataset {
    /// Builds a dataset with the declared dimensions, rejecting any pair
    /// whose input or target length disagrees. An empty pair list is
    /// accepted; training and validation report `EmptyDataset` when
    /// invoked on it.
    pub fn from_pairs(
        n_input: usize,
        n_output: usize,
        pairs: Vec<(Vec<f64>, Vec<f64>)>,
    ) -> Result<Dataset> {
        let mut exemplars = Vec::with_capacity(pairs.len());
        for (input, target) in pairs {
            if input.len() != n_input {
                return Err(NetError::DimensionMismatch {
                    what: "exemplar input",
                    expected: n_input,
                    actual: input.len(),
                });
            }
            if target.len() != n_output {
                return Err(NetError::DimensionMismatch {
                    what: "exemplar target",
                    expected: n_output,
                    actual: target.len(),
                });
            }
            exemplars.push(Exemplar::new(input, target));
        }
        Ok(Dataset {
            exemplars,
            n_input,
            n_output,
        })
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    pub fn n_output(&self) -> usize {
        self.n_output
    }

    pub fn get(&self, index: usize) -> Option<&Exemplar> {
        self.exemplars.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exemplar> {
        self.exemplars.iter()
    }

    /// Reorders the exemplars in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.exemplars.shuffle(rng);
    }

    /// Splits off the trailing `holdout_fraction` of the exemplars into a
    /// second dataset (moved, not copied). The fraction must be in
    /// [0, 1).
    pub fn split(mut self, holdout_fraction: f64) -> Result<(Dataset, Dataset)> {
        if !(0.0..1.0).contains(&holdout_fraction) {
            return Err(NetError::InvalidConfig(
                "holdout fraction must be in [0, 1)".into(),
            ));
        }
        let n_holdout = (self.exemplars.len() as f64 * holdout_fraction).floor() as usize;
        let tail = self.exemplars.split_off(self.exemplars.len() - n_holdout);
        let holdout = Dataset {
            exemplars: tail,
            n_input: self.n_input,
            n_output: self.n_output,
        };
        Ok((self, holdout))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Exemplar;
    type IntoIter = std::slice::Iter<'a, Exemplar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
