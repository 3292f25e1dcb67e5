//! Dense row-major matrix value type
//!
//! `Matrix` owns a flat `Vec<f64>` of `rows * columns` elements stored row by
//! row. Cloning deep-copies the buffer, so two matrices never alias.

use crate::error::{Axis, MatrixError, Result};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Absolute tolerance used by `PartialEq`
pub const EQUALITY_TOLERANCE: f64 = 1e-14;

/// Dense real matrix with row-major storage
#[derive(Debug, Clone)]
pub struct Matrix {
    pub(crate) rows: usize,
    pub(crate) columns: usize,
    pub(crate) elements: Vec<f64>,
}

impl Matrix {
    /// Zero matrix of the given shape
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::zeros(rows, columns)
    }

    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self { rows, columns, elements: vec![0.0; rows * columns] }
    }

    pub fn ones(rows: usize, columns: usize) -> Self {
        Self { rows, columns, elements: vec![1.0; rows * columns] }
    }

    /// n x n identity
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.elements[i * n + i] = 1.0;
        }
        m
    }

    /// 1x1 matrix holding `value`
    pub fn scalar(value: f64) -> Self {
        Self { rows: 1, columns: 1, elements: vec![value] }
    }

    /// Build from nested rows
    ///
    /// The column count is taken from the first row; every other row must
    /// match it. An empty outer sequence gives a 0x0 matrix.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut elements = Vec::with_capacity(rows.len() * columns);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != columns {
                return Err(MatrixError::InvalidLiteral { row, expected: columns, found: values.len() });
            }
            elements.extend_from_slice(values);
        }
        Ok(Self { rows: rows.len(), columns, elements })
    }

    /// Build from a row-major buffer of exactly `rows * columns` elements
    pub fn from_vec(rows: usize, columns: usize, elements: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(columns) != Some(elements.len()) {
            return Err(MatrixError::DimensionMismatch {
                operation: "from_vec",
                left: (rows, columns),
                right: (elements.len(), 1),
            });
        }
        Ok(Self { rows, columns, elements })
    }

    /// Build element by element from `f(i, j)`
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut elements = Vec::with_capacity(rows * columns);
        for i in 0..rows {
            for j in 0..columns {
                elements.push(f(i, j));
            }
        }
        Self { rows, columns, elements }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Total number of elements
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Row-major element buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.elements
    }

    /// Element at (i, j)
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_bounds(i, j)?;
        Ok(self.elements[i * self.columns + j])
    }

    /// Overwrite element (i, j)
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_bounds(i, j)?;
        self.elements[i * self.columns + j] = value;
        Ok(())
    }

    fn check_bounds(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.rows {
            return Err(MatrixError::IndexOutOfBounds { axis: Axis::Row, index: i, extent: self.rows });
        }
        if j >= self.columns {
            return Err(MatrixError::IndexOutOfBounds { axis: Axis::Column, index: j, extent: self.columns });
        }
        Ok(())
    }

    /// The single element of a 1x1 matrix
    pub fn to_scalar(&self) -> Option<f64> {
        if self.rows == 1 && self.columns == 1 {
            Some(self.elements[0])
        } else {
            None
        }
    }

    /// Same shape with every off-diagonal element zeroed
    pub fn diagonal(&self) -> Matrix {
        Self::from_fn(self.rows, self.columns, |i, j| {
            if i == j { self.elements[i * self.columns + j] } else { 0.0 }
        })
    }

    /// Row-major iterator over all elements
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.elements.iter()
    }

    /// Apply `f` to every element
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Matrix {
        Matrix {
            rows: self.rows,
            columns: self.columns,
            elements: self.elements.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Elementwise comparison with an absolute tolerance
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EQUALITY_TOLERANCE)
    }
}

impl From<f64> for Matrix {
    fn from(value: f64) -> Self {
        Matrix::scalar(value)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.rows && j < self.columns, "index ({}, {}) out of bounds for {}x{} matrix", i, j, self.rows, self.columns);
        &self.elements[i * self.columns + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(i < self.rows && j < self.columns, "index ({}, {}) out of bounds for {}x{} matrix", i, j, self.rows, self.columns);
        &mut self.elements[i * self.columns + j]
    }
}

impl<'a> IntoIterator for &'a Matrix {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for value in &self.elements[i * self.columns..(i + 1) * self.columns] {
                write!(f, "{:.3}\t", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_shape_and_order() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m[(1, 0)], 4.0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            Matrix::from_rows(&rows).unwrap_err(),
            MatrixError::InvalidLiteral { row: 1, expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_from_rows_empty() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m.size(), 0);
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 4]).is_ok());
        assert!(matches!(
            Matrix::from_vec(2, 2, vec![1.0; 3]),
            Err(MatrixError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Matrix::from_vec(usize::MAX, 3, vec![1.0; 3]),
            Err(MatrixError::DimensionMismatch { operation: "from_vec", .. })
        ));
    }

    #[test]
    fn test_get_set() {
        let mut m = Matrix::zeros(2, 3);
        m.set(1, 2, 7.5).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 7.5);
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            MatrixError::IndexOutOfBounds { axis: Axis::Row, index: 2, extent: 2 }
        );
        assert_eq!(
            m.set(0, 3, 1.0).unwrap_err(),
            MatrixError::IndexOutOfBounds { axis: Axis::Column, index: 3, extent: 3 }
        );
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let m = Matrix::zeros(2, 2);
        let _ = m[(0, 2)];
    }

    #[test]
    fn test_identity_and_diagonal() {
        let i3 = Matrix::identity(3);
        assert_eq!(i3.iter().sum::<f64>(), 3.0);

        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let d = m.diagonal();
        assert_eq!(d.shape(), (2, 3));
        assert_eq!(d.as_slice(), &[1.0, 0.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(Matrix::scalar(4.0).to_scalar(), Some(4.0));
        assert_eq!(Matrix::from(2.5).to_scalar(), Some(2.5));
        assert_eq!(Matrix::zeros(1, 2).to_scalar(), None);
    }

    #[test]
    fn test_equality_tolerance() {
        let a = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(&[[1.0 + 5e-15, 2.0]]).unwrap();
        let c = Matrix::from_rows(&[[1.0 + 1e-12, 2.0]]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Matrix::from_rows(&[[1.0], [2.0]]).unwrap());
    }

    #[test]
    fn test_iteration_is_restartable() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let first: Vec<f64> = m.iter().copied().collect();
        let second: Vec<f64> = (&m).into_iter().copied().collect();
        assert_eq!(first, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(&[[1.0, 2.5], [-3.0, 0.125]]).unwrap();
        assert_eq!(m.to_string(), "1.000\t2.500\t\n-3.000\t0.125\t\n");
        assert_eq!(Matrix::zeros(2, 0).to_string(), "\n\n");
    }
}
