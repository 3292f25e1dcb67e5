//! Utility functions for dense tensors

pub mod norms;
pub mod validation;

pub use norms::{column_norm, norm_frobenius, norm_max};
pub use validation::{is_orthogonal, validate_svd};

use crate::Array2;
use crate::config::KernelError;

/// Build a tensor from a row-major buffer
pub fn from_row_major(rows: usize, cols: usize, data: &[f64]) -> Result<Array2, KernelError> {
    if data.len() != rows * cols {
        return Err(KernelError::BadBuffer {
            rows,
            cols,
            len: data.len(),
        });
    }
    Ok(Array2::from_fn((rows, cols), |idx| data[idx[0] * cols + idx[1]]))
}

/// Flatten a tensor into a row-major buffer
pub fn to_row_major(matrix: &Array2) -> Vec<f64> {
    let (m, n) = *matrix.shape();
    let mut data = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            data.push(matrix[[i, j]]);
        }
    }
    data
}

/// Identity tensor of size n x n
pub fn eye(n: usize) -> Array2 {
    Array2::from_fn((n, n), |idx| if idx[0] == idx[1] { 1.0 } else { 0.0 })
}

/// Matrix transpose
pub fn transpose(matrix: &Array2) -> Array2 {
    let (m, n) = *matrix.shape();
    Array2::from_fn((n, m), |idx| matrix[[idx[1], idx[0]]])
}

/// Naive matrix multiplication: C = A * B
///
/// # Panics
/// Panics if the inner dimensions differ.
pub fn matmul(a: &Array2, b: &Array2) -> Array2 {
    let (m, k) = *a.shape();
    let (k2, n) = *b.shape();
    assert_eq!(k, k2, "Matrix dimension mismatch: A.cols ({}) != B.rows ({})", k, k2);

    Array2::from_fn((m, n), |idx| {
        let mut sum = 0.0;
        for l in 0..k {
            sum += a[[idx[0], l]] * b[[l, idx[1]]];
        }
        sum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_roundtrip_layout() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let t = from_row_major(2, 3, &data).unwrap();

        assert_eq!(*t.shape(), (2, 3));
        assert_eq!(t[[0, 2]], 3.0);
        assert_eq!(t[[1, 0]], 4.0);
        assert_eq!(to_row_major(&t), data.to_vec());
    }

    #[test]
    fn test_from_row_major_bad_length() {
        let result = from_row_major(2, 2, &[1.0, 2.0, 3.0]);
        assert_eq!(
            result.unwrap_err(),
            KernelError::BadBuffer { rows: 2, cols: 2, len: 3 }
        );
    }

    #[test]
    fn test_matmul_and_transpose() {
        let a = from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let ata = matmul(&transpose(&a), &a);

        assert_eq!(*ata.shape(), (3, 3));
        // First row: [1+16, 2+20, 3+24]
        assert_eq!(ata[[0, 0]], 17.0);
        assert_eq!(ata[[0, 1]], 22.0);
        assert_eq!(ata[[0, 2]], 27.0);
        assert_eq!(ata[[2, 0]], 27.0);
    }

    #[test]
    fn test_eye() {
        let i3 = eye(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(i3[[i, j]], if i == j { 1.0 } else { 0.0 });
            }
        }
    }
}
