//! Reduction to upper Hessenberg form by Householder similarity transforms

use crate::Array2;
use crate::qr::reflector;

/// Reduce `matrix` to upper Hessenberg form H = P^T * A * P
///
/// The orthogonal transform is not accumulated: only the eigenvalues of H are
/// used downstream.
pub fn hessenberg(matrix: &Array2) -> Array2 {
    let (n, _) = *matrix.shape();
    let mut h = matrix.clone();

    for k in 0..n.saturating_sub(2) {
        let tau = reflector(&mut h, k, k + 1);
        if tau == 0.0 {
            continue;
        }

        // v = [1, h[k+2.., k]]
        let mut v = vec![1.0; n - k - 1];
        for i in (k + 2)..n {
            v[i - k - 1] = h[[i, k]];
            h[[i, k]] = 0.0;
        }

        apply_left(&mut h, &v, k + 1, tau, (k + 1)..n);
        apply_right(&mut h, &v, k + 1, tau, 0..n);
    }

    h
}

/// A <- (I - tau v v^T) A on rows `start..`, columns `cols`
fn apply_left(a: &mut Array2, v: &[f64], start: usize, tau: f64, cols: std::ops::Range<usize>) {
    for j in cols {
        let mut w = 0.0;
        for (l, &vl) in v.iter().enumerate() {
            w += vl * a[[start + l, j]];
        }
        w *= tau;
        for (l, &vl) in v.iter().enumerate() {
            a[[start + l, j]] -= w * vl;
        }
    }
}

/// A <- A (I - tau v v^T) on columns `start..`, rows `rows`
fn apply_right(a: &mut Array2, v: &[f64], start: usize, tau: f64, rows: std::ops::Range<usize>) {
    for i in rows {
        let mut w = 0.0;
        for (l, &vl) in v.iter().enumerate() {
            w += a[[i, start + l]] * vl;
        }
        w *= tau;
        for (l, &vl) in v.iter().enumerate() {
            a[[i, start + l]] -= w * vl;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::from_row_major;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hessenberg_structure_and_invariants() {
        let a = from_row_major(4, 4, &[
            4.0, 1.0, -2.0, 2.0,
            1.0, 2.0, 0.0, 1.0,
            -2.0, 0.0, 3.0, -2.0,
            2.0, 1.0, -2.0, -1.0,
        ])
        .unwrap();
        let h = hessenberg(&a);

        for i in 2..4 {
            for j in 0..(i - 1) {
                assert_eq!(h[[i, j]], 0.0);
            }
        }

        // Similarity preserves the trace
        let trace_a: f64 = (0..4).map(|i| a[[i, i]]).sum();
        let trace_h: f64 = (0..4).map(|i| h[[i, i]]).sum();
        assert_abs_diff_eq!(trace_a, trace_h, epsilon = 1e-12);
    }
}
