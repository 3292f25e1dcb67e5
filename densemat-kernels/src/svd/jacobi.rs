//! One-sided Jacobi SVD with QR preconditioning

use crate::Array2;
use crate::config::{KernelConfig, KernelError};
use crate::qr::householder_qr;
use crate::utils::{column_norm, eye, transpose};

/// Result of a full SVD: A = U * diag(s) * VT
#[derive(Debug, Clone)]
pub struct FullSvd {
    /// Left singular vectors (m x m)
    pub u: Array2,
    /// Singular values, descending (min(m, n))
    pub s: Vec<f64>,
    /// Transposed right singular vectors (n x n)
    pub vt: Array2,
}

/// Plane rotation acting on a pair of columns
#[derive(Debug, Clone, Copy)]
struct JacobiRotation {
    c: f64, // cosine
    s: f64, // sine
}

impl JacobiRotation {
    /// Rotation that makes columns with Gram entries (alpha, beta, gamma) orthogonal
    ///
    /// Solves t^2 + 2*zeta*t - 1 = 0 for the smaller root, zeta = (beta - alpha) / (2 gamma).
    fn orthogonalizing(alpha: f64, beta: f64, gamma: f64) -> Self {
        let zeta = (beta - alpha) / (2.0 * gamma);
        let sign = if zeta >= 0.0 { 1.0 } else { -1.0 };
        let t = sign / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: c * t }
    }

    /// [a_p, a_q] <- [a_p, a_q] * [[c, s], [-s, c]]
    fn apply_right(&self, matrix: &mut Array2, p: usize, q: usize) {
        let (rows, _) = *matrix.shape();
        for k in 0..rows {
            let xp = matrix[[k, p]];
            let xq = matrix[[k, q]];
            matrix[[k, p]] = self.c * xp - self.s * xq;
            matrix[[k, q]] = self.s * xp + self.c * xq;
        }
    }
}

/// Full SVD of an arbitrary real matrix
///
/// Wide matrices are handled through the SVD of their transpose. Tall and
/// square matrices are first reduced to a square triangular factor with
/// Householder QR, then orthogonalized column-pairwise (Hestenes). Left
/// singular vectors belonging to zero singular values are completed to an
/// orthonormal basis so that U is always square and orthogonal.
pub fn jacobi_svd(matrix: &Array2, config: &KernelConfig) -> Result<FullSvd, KernelError> {
    let (m, n) = *matrix.shape();

    if m < n {
        let t = jacobi_svd(&transpose(matrix), config)?;
        return Ok(FullSvd {
            u: transpose(&t.vt),
            s: t.s,
            vt: transpose(&t.u),
        });
    }

    if n == 0 {
        return Ok(FullSvd {
            u: eye(m),
            s: Vec::new(),
            vt: eye(0),
        });
    }

    // QR preconditioner: A = Q * [R1; 0], then SVD(R1)
    let qr = householder_qr(matrix);
    let q = qr.q();
    let r = qr.r();
    let mut w = Array2::from_fn((n, n), |idx| r[[idx[0], idx[1]]]);
    let mut v = eye(n);

    let mut converged = false;
    for sweep in 0..config.max_sweeps {
        let mut rotated = false;

        for p in 0..n.saturating_sub(1) {
            for qi in (p + 1)..n {
                let mut alpha = 0.0;
                let mut beta = 0.0;
                let mut gamma = 0.0;
                for k in 0..n {
                    alpha += w[[k, p]] * w[[k, p]];
                    beta += w[[k, qi]] * w[[k, qi]];
                    gamma += w[[k, p]] * w[[k, qi]];
                }

                if gamma == 0.0 || gamma.abs() <= f64::EPSILON * (alpha * beta).sqrt() {
                    continue;
                }

                rotated = true;
                let rot = JacobiRotation::orthogonalizing(alpha, beta, gamma);
                rot.apply_right(&mut w, p, qi);
                rot.apply_right(&mut v, p, qi);
            }
        }

        if !rotated {
            log::debug!("Jacobi SVD converged after {} sweeps", sweep + 1);
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(KernelError::NoConvergence {
            iterations: config.max_sweeps,
        });
    }

    // Singular values are the column norms of the orthogonalized factor
    let sigma: Vec<f64> = (0..n).map(|j| column_norm(&w, j, 0)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| sigma[b].total_cmp(&sigma[a]));

    let sigma_max = sigma[order[0]];
    let null_tol = sigma_max * (n as f64) * f64::EPSILON;

    let mut ur = Array2::from_elem((n, n), 0.0);
    let mut filled = vec![false; n];
    for (k, &j) in order.iter().enumerate() {
        if sigma[j] > null_tol && sigma[j] > 0.0 {
            for i in 0..n {
                ur[[i, k]] = w[[i, j]] / sigma[j];
            }
            filled[k] = true;
        }
    }
    complete_orthonormal(&mut ur, &mut filled);

    // U = Q * blockdiag(Ur, I)
    let u = Array2::from_fn((m, m), |idx| {
        let (i, k) = (idx[0], idx[1]);
        if k < n {
            let mut sum = 0.0;
            for l in 0..n {
                sum += q[[i, l]] * ur[[l, k]];
            }
            sum
        } else {
            q[[i, k]]
        }
    });

    let vt = Array2::from_fn((n, n), |idx| v[[idx[1], order[idx[0]]]]);
    let s = order.iter().map(|&j| sigma[j]).collect();

    Ok(FullSvd { u, s, vt })
}

/// Fill the unset columns of `basis` with unit vectors orthogonal to the set ones
///
/// Each missing column takes the standard basis vector with the largest
/// component outside the current span, orthogonalized twice.
fn complete_orthonormal(basis: &mut Array2, filled: &mut [bool]) {
    let (n, _) = *basis.shape();

    for k in 0..n {
        if filled[k] {
            continue;
        }

        let mut best: Option<(f64, Vec<f64>)> = None;
        for e in 0..n {
            let mut candidate = vec![0.0; n];
            candidate[e] = 1.0;
            for _ in 0..2 {
                for c in (0..n).filter(|&c| filled[c]) {
                    let mut proj = 0.0;
                    for i in 0..n {
                        proj += candidate[i] * basis[[i, c]];
                    }
                    for i in 0..n {
                        candidate[i] -= proj * basis[[i, c]];
                    }
                }
            }
            let norm = candidate.iter().map(|x| x * x).sum::<f64>().sqrt();
            if best.as_ref().map_or(true, |(b, _)| norm > *b) {
                best = Some((norm, candidate));
            }
        }

        if let Some((norm, candidate)) = best {
            for i in 0..n {
                basis[[i, k]] = candidate[i] / norm;
            }
            filled[k] = true;
        }
    }
}
