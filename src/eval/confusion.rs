use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Square count table of actual versus predicted classes over a fixed
/// class set, with marginal totals maintained incrementally.
///
/// The table is the single source of truth: accuracy, precision, recall,
/// and F1 are derived from it on demand. Counts only grow (or reset
/// wholesale); cells are never decremented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: usize,
    /// Row-major `classes × classes`; row = actual, column = predicted.
    counts: Vec<u32>,
    actual_totals: Vec<u32>,
    predicted_totals: Vec<u32>,
    total: u32,
}

impl ConfusionMatrix {
    pub fn new(classes: usize) -> ConfusionMatrix {
        assert!(classes > 0, "confusion matrix needs at least one class");
        ConfusionMatrix {
            classes,
            counts: vec![0; classes * classes],
            actual_totals: vec![0; classes],
            predicted_totals: vec![0; classes],
            total: 0,
        }
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Number of observations recorded so far; always equals the sum of
    /// all cells.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn count(&self, actual: usize, predicted: usize) -> u32 {
        self.counts[actual * self.classes + predicted]
    }

    /// Records one observation. Fails when either index is outside the
    /// class set fixed at construction.
    pub fn record(&mut self, actual: usize, predicted: usize) -> Result<()> {
        if actual >= self.classes {
            return Err(NetError::DimensionMismatch {
                what: "actual class index",
                expected: self.classes,
                actual,
            });
        }
        if predicted >= self.classes {
            return Err(NetError::DimensionMismatch {
                what: "predicted class index",
                expected: self.classes,
                actual: predicted,
            });
        }
        self.counts[actual * self.classes + predicted] += 1;
        self.actual_totals[actual] += 1;
        self.predicted_totals[predicted] += 1;
        self.total += 1;
        Ok(())
    }

    /// Clears every cell and total.
    pub fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.actual_totals.iter_mut().for_each(|c| *c = 0);
        self.predicted_totals.iter_mut().for_each(|c| *c = 0);
        self.total = 0;
    }

    /// Fraction of observations on the diagonal; 0.0 when nothing has
    /// been recorded.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let correct: u32 = (0..self.classes).map(|i| self.count(i, i)).sum();
        correct as f64 / self.total as f64
    }

    /// Positive predictive value of one class; 0.0 when the class was
    /// never predicted.
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.predicted_totals[class];
        if predicted == 0 {
            return 0.0;
        }
        self.count(class, class) as f64 / predicted as f64
    }

    /// True-positive rate of one class; 0.0 when the class never
    /// occurred.
    pub fn recall(&self, class: usize) -> f64 {
        let actual = self.actual_totals[class];
        if actual == 0 {
            return 0.0;
        }
        self.count(class, class) as f64 / actual as f64
    }

    /// Harmonic mean of precision and recall; 0.0 when both are zero.
    pub fn f1(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * (p * r) / (p + r)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     predict")?;
        write!(f, "     ")?;
        for i in 0..self.classes {
            write!(f, " {:>6}", format!("P{:02}", i + 1))?;
        }
        writeln!(f)?;
        for row in 0..self.classes {
            write!(f, "  T{:02}", row + 1)?;
            for col in 0..self.classes {
                write!(f, " {:>6}", self.count(row, col))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nAccuracy  = {:.6}", self.accuracy())?;
        write!(f, "Precision =")?;
        for i in 0..self.classes {
            write!(f, " {:.6}", self.precision(i))?;
        }
        write!(f, "\nRecall    =")?;
        for i in 0..self.classes {
            write!(f, " {:.6}", self.recall(i))?;
        }
        write!(f, "\nF1-score  =")?;
        for i in 0..self.classes {
            write!(f, " {:.6}", self.f1(i))?;
        }
        writeln!(f)
    }
}
