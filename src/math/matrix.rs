use std::f64::consts::PI;
use std::ops::{Add, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f64`.
///
/// Shapes are fixed at construction; shape contracts of the internal
/// operations are asserted, since a violation is a programming error, not
/// a recoverable condition. User-facing length checks live in the layer
/// and network code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a 1×n row vector from a slice.
    pub fn row_vector(values: &[f64]) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: values.to_vec(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Matrix {
        let n_rows = rows.len();
        assert!(n_rows > 0, "from_rows requires at least one row");
        let n_cols = rows[0].len();
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            assert_eq!(row.len(), n_cols, "ragged rows");
            data.extend(row);
        }
        Matrix {
            rows: n_rows,
            cols: n_cols,
            data,
        }
    }

    /// Uniform initialization on [-1, 1).
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for v in res.data.iter_mut() {
            *v = rng.gen::<f64>() * 2.0 - 1.0;
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1] to avoid log(0).
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)).
    ///
    /// Suited to Sigmoid/Tanh/Linear layers. `rows` is the fan-in under
    /// the row-vector convention (`x · W`).
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / rows as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for v in res.data.iter_mut() {
            *v = Matrix::sample_standard_normal(rng) * std_dev;
        }
        res
    }

    /// He initialization: N(0, sqrt(2 / rows)).
    ///
    /// Suited to ReLU-family layers; the variance 2/fan_in accounts for
    /// ReLU zeroing half of its inputs on average.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / rows as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for v in res.data.iter_mut() {
            *v = Matrix::sample_standard_normal(rng) * std_dev;
        }
        res
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows, "hadamard row mismatch");
        assert_eq!(self.cols, rhs.cols, "hadamard col mismatch");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a * b)
                .collect(),
        }
    }

    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.cols, rhs.rows, "matmul inner dimension mismatch");
        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..rhs.cols {
                    res.data[i * rhs.cols + j] += a * rhs.data[k * rhs.cols + j];
                }
            }
        }
        res
    }

    /// Outer product of two vectors: column · row.
    pub fn outer(col: &[f64], row: &[f64]) -> Matrix {
        let mut res = Matrix::zeros(col.len(), row.len());
        for (i, &c) in col.iter().enumerate() {
            for (j, &r) in row.iter().enumerate() {
                res.data[i * row.len() + j] = c * r;
            }
        }
        res
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Whether the buffer length agrees with the declared shape; can only
    /// be false for a value that came in through deserialization.
    pub(crate) fn is_consistent(&self) -> bool {
        self.data.len() == self.rows * self.cols
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows, "add row mismatch");
        assert_eq!(self.cols, rhs.cols, "add col mismatch");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a + b)
                .collect(),
        }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows, "sub row mismatch");
        assert_eq!(self.cols, rhs.cols, "sub col mismatch");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| a - b)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_swaps_shape_and_entries() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.get(0, 1), 4.0);
        assert_eq!(t.get(2, 0), 3.0);
    }

    #[test]
    fn matmul_row_vector_against_weights() {
        let x = Matrix::row_vector(&[1.0, 2.0]);
        let w = Matrix::from_rows(vec![vec![1.0, 0.0, -1.0], vec![0.5, 1.0, 2.0]]);
        let y = x.matmul(&w);
        assert_eq!(y.rows(), 1);
        assert_eq!(y.cols(), 3);
        assert_eq!(y.row(0), &[2.0, 2.0, 3.0]);
    }

    #[test]
    fn outer_product_shape() {
        let m = Matrix::outer(&[1.0, 2.0, 3.0], &[4.0, 5.0]);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.get(2, 1), 15.0);
    }

    #[test]
    fn hadamard_is_element_wise() {
        let a = Matrix::row_vector(&[1.0, 2.0, 3.0]);
        let b = Matrix::row_vector(&[2.0, 0.5, -1.0]);
        assert_eq!(a.hadamard(&b).row(0), &[2.0, 1.0, -3.0]);
    }

    #[test]
    fn xavier_values_are_finite_and_spread() {
        let mut rng = rand::thread_rng();
        let m = Matrix::xavier(50, 20, &mut rng);
        assert!(m.is_finite());
        assert!(m.values().iter().any(|&v| v != 0.0));
    }
}
