//! Householder reflection utilities for QR decomposition

use crate::Array2;
use crate::utils::norms::column_norm;

/// Compute the Householder reflection for column `col`, rows `start..`
///
/// Overwrites the column so that `a[start, col] = beta` and the entries below
/// hold the reflector vector `v[1..]` (with `v[0] = 1` implied). The reflection
/// is `H = I - tau * v * v^T` with `H * x = [beta, 0, ..., 0]^T`.
///
/// Returns `tau` (zero when the column is already zero).
pub fn reflector(a: &mut Array2, col: usize, start: usize) -> f64 {
    let (m, _) = *a.shape();
    if start >= m {
        return 0.0;
    }

    let norm_x = column_norm(a, col, start);
    if norm_x == 0.0 {
        return 0.0;
    }

    let x0 = a[[start, col]];
    // nu = sign(x0) * ||x||
    let nu = if x0 >= 0.0 { norm_x } else { -norm_x };
    let x0_new = x0 + nu;
    a[[start, col]] = -nu;

    for i in (start + 1)..m {
        a[[i, col]] /= x0_new;
    }

    x0_new / nu
}

/// Apply `H = I - tau * v * v^T` from the left to columns `cols` of `target`
///
/// `v` is read from column `v_col` of `factors`, rows `start..`, with the
/// leading unit element implied.
pub fn reflector_apply(
    factors: &Array2,
    v_col: usize,
    start: usize,
    tau: f64,
    target: &mut Array2,
    cols: std::ops::Range<usize>,
) {
    let (m, _) = *target.shape();
    if tau == 0.0 || start >= m {
        return;
    }

    for j in cols {
        // vaj = tau * (A(start, j) + v[1..] . A[start+1.., j])
        let mut vaj = target[[start, j]];
        for i in (start + 1)..m {
            vaj += factors[[i, v_col]] * target[[i, j]];
        }
        vaj *= tau;

        target[[start, j]] -= vaj;
        for i in (start + 1)..m {
            target[[i, j]] -= vaj * factors[[i, v_col]];
        }
    }
}

/// Packed Householder QR factorization (Q and R stored together)
#[derive(Debug, Clone)]
pub struct HouseholderQr {
    /// R on and above the diagonal, reflector vectors below it
    pub factors: Array2,
    /// Householder reflection coefficients
    pub taus: Vec<f64>,
}

/// Householder QR without pivoting: A = Q * R
pub fn householder_qr(matrix: &Array2) -> HouseholderQr {
    let (m, n) = *matrix.shape();
    let k = m.min(n);
    let mut factors = matrix.clone();
    let mut taus = vec![0.0; k];

    for i in 0..k {
        let tau = reflector(&mut factors, i, i);
        taus[i] = tau;

        if tau != 0.0 && i + 1 < n {
            // Apply H_i to the trailing columns; the reflector itself is read
            // from a snapshot since it lives in the same tensor
            let snapshot = factors.clone();
            reflector_apply(&snapshot, i, i, tau, &mut factors, (i + 1)..n);
        }
    }

    HouseholderQr { factors, taus }
}

impl HouseholderQr {
    /// Full orthogonal factor Q (m x m)
    pub fn q(&self) -> Array2 {
        let (m, _) = *self.factors.shape();
        let mut q = crate::utils::eye(m);

        // Q = H_0 * H_1 * ... * H_{k-1}, applied right-to-left onto the identity
        for i in (0..self.taus.len()).rev() {
            reflector_apply(&self.factors, i, i, self.taus[i], &mut q, 0..m);
        }

        q
    }

    /// Upper trapezoidal factor R (m x n)
    pub fn r(&self) -> Array2 {
        let (m, n) = *self.factors.shape();
        Array2::from_fn((m, n), |idx| {
            if idx[1] >= idx[0] { self.factors[[idx[0], idx[1]]] } else { 0.0 }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{from_row_major, is_orthogonal, matmul};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reflector_zeroes_column() {
        let mut a = from_row_major(3, 1, &[3.0, 4.0, 0.0]).unwrap();
        let tau = reflector(&mut a, 0, 0);

        assert!(tau > 0.0);
        assert_abs_diff_eq!(a[[0, 0]], -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflector_zero_column() {
        let mut a = Array2::from_elem((3, 1), 0.0);
        assert_eq!(reflector(&mut a, 0, 0), 0.0);
    }

    #[test]
    fn test_householder_qr_reconstruction() {
        let a = from_row_major(4, 3, &[
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 10.0,
            1.0, 0.0, 1.0,
        ])
        .unwrap();

        let qr = householder_qr(&a);
        let q = qr.q();
        let r = qr.r();

        assert_eq!(*q.shape(), (4, 4));
        assert_eq!(*r.shape(), (4, 3));
        assert!(is_orthogonal(&q, 1e-12));

        let reconstructed = matmul(&q, &r);
        for i in 0..4 {
            for j in 0..3 {
                assert_abs_diff_eq!(reconstructed[[i, j]], a[[i, j]], epsilon = 1e-12);
            }
        }

        // R is upper triangular
        for i in 0..4 {
            for j in 0..i.min(3) {
                assert_eq!(r[[i, j]], 0.0);
            }
        }
    }
}
