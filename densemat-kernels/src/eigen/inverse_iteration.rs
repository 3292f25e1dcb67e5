//! Eigenvectors by shifted inverse iteration

use crate::Array2;
use crate::config::KernelError;
use crate::lu::{lu_factor_with_floor, lu_solve};
use crate::utils::norm_max;

/// Unit eigenvector of `matrix` for the real eigenvalue estimate `lambda`
///
/// Solves `(A - sigma*I) x = b` repeatedly with `sigma` nudged off `lambda`.
/// `index` only varies the starting vector so repeated eigenvalues do not all
/// start from the same point. The result is normalized to unit 2-norm with its
/// largest-magnitude component positive.
pub fn inverse_iteration(matrix: &Array2, lambda: f64, index: usize, iterations: usize) -> Result<Vec<f64>, KernelError> {
    let (n, _) = *matrix.shape();
    let scale = norm_max(matrix).max(1.0);
    let sigma = lambda + 1e-10 * scale;

    let mut shifted = matrix.clone();
    for i in 0..n {
        shifted[[i, i]] -= sigma;
    }
    let pivots = lu_factor_with_floor(&mut shifted, scale * f64::EPSILON)?;

    let mut x: Vec<f64> = (0..n)
        .map(|i| 1.0 + 0.1 * ((i * 7 + index * 3) % 5) as f64)
        .collect();
    normalize(&mut x);

    for _ in 0..iterations.max(1) {
        let mut next = x.clone();
        lu_solve(&shifted, &pivots, &mut next)?;
        if !normalize(&mut next) {
            break;
        }
        x = next;
    }

    let largest = x
        .iter()
        .copied()
        .fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
    if largest < 0.0 {
        x.iter_mut().for_each(|v| *v = -*v);
    }

    Ok(x)
}

/// Scale `x` to unit 2-norm; returns false if that is impossible
fn normalize(x: &mut [f64]) -> bool {
    let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    x.iter_mut().for_each(|v| *v /= norm);
    true
}
