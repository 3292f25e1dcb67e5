//! Conversions between `Matrix` and `mdarray` tensors

use crate::matrix::Matrix;
use mdarray::Tensor;

impl From<&Matrix> for Tensor<f64, (usize, usize)> {
    fn from(matrix: &Matrix) -> Self {
        let columns = matrix.columns;
        Tensor::from_fn((matrix.rows, columns), |idx| matrix.elements[idx[0] * columns + idx[1]])
    }
}

impl From<&Tensor<f64, (usize, usize)>> for Matrix {
    fn from(tensor: &Tensor<f64, (usize, usize)>) -> Self {
        let (rows, columns) = *tensor.shape();
        Matrix::from_fn(rows, columns, |i, j| tensor[[i, j]])
    }
}
