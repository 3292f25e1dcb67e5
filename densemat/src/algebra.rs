//! Matrix product, powers, concatenation and reductions

use crate::backend::{NumericBackend, with_backend};
use crate::error::{BackendError, MatrixError, Result};
use crate::matrix::Matrix;

/// Axis folded by [`Matrix::reduce_along_dimension`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Fold each row into one value, giving a single column
    Row,
    /// Fold each column into one value, giving a single row
    Column,
}

/// `a * b` using `backend` for the product kernel
///
/// Falls back to a triple loop when the backend has no dgemm.
pub fn matrix_product_with(backend: &dyn NumericBackend, a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.columns != b.rows {
        return Err(MatrixError::DimensionMismatch {
            operation: "matrix_product",
            left: a.shape(),
            right: b.shape(),
        });
    }
    let (m, k, n) = (a.rows, a.columns, b.columns);
    let mut elements = vec![0.0; m * n];

    match backend.dgemm(m, n, k, &a.elements, &b.elements, &mut elements) {
        Ok(()) => {}
        Err(BackendError::Unsupported(_)) => {
            log::debug!("{} has no dgemm, using triple loop", backend.name());
            naive_product(m, n, k, &a.elements, &b.elements, &mut elements);
        }
        Err(err) => {
            log::warn!("{} dgemm failed ({}), using triple loop", backend.name(), err);
            naive_product(m, n, k, &a.elements, &b.elements, &mut elements);
        }
    }
    Ok(Matrix { rows: m, columns: n, elements })
}

fn naive_product(m: usize, n: usize, k: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for l in 0..k {
                sum += a[i * k + l] * b[l * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

impl Matrix {
    /// Matrix product on the active backend
    pub fn matrix_product(&self, other: &Matrix) -> Result<Matrix> {
        with_backend(|backend| matrix_product_with(backend, self, other))
    }

    /// Integer power of a square matrix
    ///
    /// `A^0` is the identity; negative powers invert `A^|n|` and fail with
    /// `Singular` when that is not invertible.
    pub fn power(&self, n: i32) -> Result<Matrix> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare { rows: self.rows, columns: self.columns });
        }
        if n == 0 {
            return Ok(Matrix::identity(self.rows));
        }

        let mut result = self.clone();
        for _ in 1..n.unsigned_abs() {
            result = self.matrix_product(&result)?;
        }

        if n < 0 {
            result.inverse()?.ok_or(MatrixError::Singular)
        } else {
            Ok(result)
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut elements = vec![0.0; self.elements.len()];
        with_backend(|backend| backend.transpose(self.rows, self.columns, &self.elements, &mut elements));
        Matrix { rows: self.columns, columns: self.rows, elements }
    }

    /// `[self | other]`
    pub fn concat_horizontal(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows {
            return Err(MatrixError::DimensionMismatch {
                operation: "concat_horizontal",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let columns = self.columns + other.columns;
        let mut elements = Vec::with_capacity(self.rows * columns);
        for i in 0..self.rows {
            elements.extend_from_slice(&self.elements[i * self.columns..(i + 1) * self.columns]);
            elements.extend_from_slice(&other.elements[i * other.columns..(i + 1) * other.columns]);
        }
        Ok(Matrix { rows: self.rows, columns, elements })
    }

    /// `self` stacked above `other`
    pub fn concat_vertical(&self, other: &Matrix) -> Result<Matrix> {
        if self.columns != other.columns {
            return Err(MatrixError::DimensionMismatch {
                operation: "concat_vertical",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut elements = Vec::with_capacity(self.elements.len() + other.elements.len());
        elements.extend_from_slice(&self.elements);
        elements.extend_from_slice(&other.elements);
        Ok(Matrix { rows: self.rows + other.rows, columns: self.columns, elements })
    }

    /// Dot product of two column vectors of equal length
    pub fn dot(&self, other: &Matrix) -> Result<f64> {
        if self.columns != 1 || other.columns != 1 || self.rows != other.rows {
            return Err(MatrixError::DimensionMismatch { operation: "dot", left: self.shape(), right: other.shape() });
        }
        Ok(with_backend(|backend| backend.dot(&self.elements, &other.elements)))
    }

    /// Projection of this column vector onto `v`
    pub fn projection_on(&self, v: &Matrix) -> Result<Matrix> {
        let coefficient = self.dot(v)? / v.dot(v)?;
        Ok(v.scale_by(coefficient))
    }

    /// Fold each row (or column) with `combine`, starting from `initial`
    pub fn reduce_along_dimension(&self, dimension: Dimension, initial: f64, combine: impl Fn(f64, f64) -> f64) -> Matrix {
        match dimension {
            Dimension::Row => Matrix::from_fn(self.rows, 1, |i, _| {
                (0..self.columns).fold(initial, |acc, j| combine(acc, self.elements[i * self.columns + j]))
            }),
            Dimension::Column => Matrix::from_fn(1, self.columns, |_, j| {
                (0..self.rows).fold(initial, |acc, i| combine(acc, self.elements[i * self.columns + j]))
            }),
        }
    }

    /// Same elements in row-major order under a new shape
    pub fn reshape(&self, rows: usize, columns: usize) -> Result<Matrix> {
        if rows.checked_mul(columns) != Some(self.elements.len()) {
            return Err(MatrixError::InvalidReshape { from: self.shape(), to: (rows, columns) });
        }
        Ok(Matrix { rows, columns, elements: self.elements.clone() })
    }

    pub fn trace(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare { rows: self.rows, columns: self.columns });
        }
        Ok((0..self.rows).map(|i| self.elements[i * self.columns + i]).sum())
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.elements.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}
