//! Vector and matrix norm computations

use crate::Array2;

/// Euclidean norm of column `col`, restricted to rows `start..`
pub fn column_norm(mat: &Array2, col: usize, start: usize) -> f64 {
    let (m, _) = *mat.shape();
    let mut sum = 0.0;
    for i in start..m {
        let val = mat[[i, col]];
        sum += val * val;
    }
    sum.sqrt()
}

/// Compute the Frobenius norm of a matrix
pub fn norm_frobenius(mat: &Array2) -> f64 {
    let (m, n) = *mat.shape();
    let mut sum = 0.0;
    for i in 0..m {
        for j in 0..n {
            let val = mat[[i, j]];
            sum += val * val;
        }
    }
    sum.sqrt()
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max(mat: &Array2) -> f64 {
    let (m, n) = *mat.shape();
    let mut max_val = 0.0_f64;
    for i in 0..m {
        for j in 0..n {
            max_val = max_val.max(mat[[i, j]].abs());
        }
    }
    max_val
}
