//! Result validation utilities

use crate::Array2;

/// Validate a full SVD result
///
/// Checks that A = U * diag(s) * VT with U (m x m) and VT (n x n) orthogonal,
/// and that the singular values are non-negative and sorted descending.
pub fn validate_svd(original: &Array2, u: &Array2, s: &[f64], vt: &Array2, tolerance: f64) -> bool {
    let (m, n) = *original.shape();

    if *u.shape() != (m, m) || *vt.shape() != (n, n) || s.len() != m.min(n) {
        return false;
    }

    if !is_orthogonal(u, tolerance) || !is_orthogonal(vt, tolerance) {
        return false;
    }

    if !is_singular_values_valid(s, tolerance) {
        return false;
    }

    is_reconstruction_valid(original, u, s, vt, tolerance)
}

/// Check if the columns of a matrix are orthonormal (Q^T * Q = I)
pub fn is_orthogonal(matrix: &Array2, tolerance: f64) -> bool {
    let (rows, k) = *matrix.shape();

    for i in 0..k {
        for j in 0..k {
            let mut sum = 0.0;
            for row in 0..rows {
                sum += matrix[[row, i]] * matrix[[row, j]];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            if (sum - expected).abs() > tolerance {
                return false;
            }
        }
    }

    true
}

/// Non-negative and sorted in descending order
fn is_singular_values_valid(s: &[f64], tolerance: f64) -> bool {
    if s.iter().any(|&v| v < -tolerance) {
        return false;
    }
    s.windows(2).all(|w| w[0] >= w[1] - tolerance)
}

/// Check that ||A - U*S*VT||_F < tolerance * ||A||_F
fn is_reconstruction_valid(original: &Array2, u: &Array2, s: &[f64], vt: &Array2, tolerance: f64) -> bool {
    let (m, n) = *original.shape();

    let mut diff_norm_sq = 0.0;
    let mut orig_norm_sq = 0.0;

    for i in 0..m {
        for j in 0..n {
            let mut reconstructed = 0.0;
            for (l, &sv) in s.iter().enumerate() {
                reconstructed += u[[i, l]] * sv * vt[[l, j]];
            }

            let diff = original[[i, j]] - reconstructed;
            diff_norm_sq += diff * diff;
            orig_norm_sq += original[[i, j]] * original[[i, j]];
        }
    }

    let diff_norm = diff_norm_sq.sqrt();
    let orig_norm = orig_norm_sq.sqrt();

    if orig_norm == 0.0 {
        diff_norm < tolerance
    } else {
        diff_norm < tolerance * orig_norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{eye, from_row_major};

    #[test]
    fn test_validate_svd_identity() {
        let original = eye(3);
        let u = eye(3);
        let vt = eye(3);

        assert!(validate_svd(&original, &u, &[1.0, 1.0, 1.0], &vt, 1e-10));
    }

    #[test]
    fn test_validate_svd_rejects_wrong_values() {
        let original = eye(2);
        assert!(!validate_svd(&original, &eye(2), &[2.0, 1.0], &eye(2), 1e-10));
        assert!(!validate_svd(&original, &eye(2), &[1.0], &eye(2), 1e-10));
    }

    #[test]
    fn test_is_orthogonal() {
        assert!(is_orthogonal(&eye(3), 1e-10));

        let rotation = from_row_major(2, 2, &[0.6, -0.8, 0.8, 0.6]).unwrap();
        assert!(is_orthogonal(&rotation, 1e-10));

        let shear = from_row_major(2, 2, &[1.0, 1.0, 0.0, 1.0]).unwrap();
        assert!(!is_orthogonal(&shear, 1e-10));
    }

    #[test]
    fn test_is_singular_values_valid() {
        assert!(is_singular_values_valid(&[3.0, 2.0, 1.0], 1e-10));
        assert!(!is_singular_values_valid(&[1.0, 2.0, 3.0], 1e-10));
        assert!(!is_singular_values_valid(&[3.0, -1.0, 1.0], 1e-10));
    }
}
