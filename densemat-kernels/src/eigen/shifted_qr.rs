//! Francis double-shift QR iteration on an upper Hessenberg matrix

use crate::Array2;
use crate::config::KernelError;
use crate::utils::norm_max;

/// Eigenvalues of the upper Hessenberg matrix `h` as (real parts, imaginary parts)
///
/// Each step applies the two shifts of the trailing 2x2 block implicitly, so
/// complex conjugate shifts are handled in real arithmetic. Eigenvalues are
/// reported by diagonal position once the matrix has been deflated to 1x1 and
/// 2x2 blocks. Complex conjugate pairs come from 2x2 blocks and are stored
/// with the positive imaginary part first.
///
/// Only the active window is updated, so `h` is not a valid Schur form on return.
pub fn hessenberg_eigenvalues(h: &mut Array2, max_iterations: usize) -> Result<(Vec<f64>, Vec<f64>), KernelError> {
    let (n, _) = *h.shape();
    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    let h_norm = norm_max(h);

    let mut end = n;
    let mut iterations = 0;

    while end > 0 {
        let hi = end - 1;

        // Find the top of the unreduced block ending at `hi`
        let mut lo = hi;
        while lo > 0 {
            let mut scale = h[[lo - 1, lo - 1]].abs() + h[[lo, lo]].abs();
            if scale == 0.0 {
                scale = h_norm;
            }
            if h[[lo, lo - 1]].abs() <= f64::EPSILON * scale {
                h[[lo, lo - 1]] = 0.0;
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            re[hi] = h[[hi, hi]];
            end -= 1;
            iterations = 0;
            continue;
        }

        if lo + 1 == hi {
            let (l1, l2) = block_eigenvalues(h[[lo, lo]], h[[lo, hi]], h[[hi, lo]], h[[hi, hi]]);
            re[lo] = l1.0;
            im[lo] = l1.1;
            re[hi] = l2.0;
            im[hi] = l2.1;
            end -= 2;
            iterations = 0;
            continue;
        }

        if iterations >= max_iterations {
            return Err(KernelError::NoConvergence { iterations });
        }
        iterations += 1;

        let (sum, product) = if iterations % 10 == 0 {
            exceptional_shifts(h, lo, hi)
        } else {
            let (a, b, c, d) = (h[[hi - 1, hi - 1]], h[[hi - 1, hi]], h[[hi, hi - 1]], h[[hi, hi]]);
            (a + d, a * d - b * c)
        };

        francis_step(h, lo, hi, sum, product);
    }

    Ok((re, im))
}

/// Eigenvalues of [[a, b], [c, d]] as ((re, im), (re, im))
fn block_eigenvalues(a: f64, b: f64, c: f64, d: f64) -> ((f64, f64), (f64, f64)) {
    let scale = a.abs() + b.abs() + c.abs() + d.abs();
    if scale == 0.0 {
        return ((0.0, 0.0), (0.0, 0.0));
    }
    let (a, b, c, d) = (a / scale, b / scale, c / scale, d / scale);

    let mean = 0.5 * (a + d);
    let half_diff = 0.5 * (a - d);
    let disc = half_diff * half_diff + b * c;

    if disc >= 0.0 {
        let root = disc.sqrt();
        ((scale * (mean + root), 0.0), (scale * (mean - root), 0.0))
    } else {
        let root = (-disc).sqrt();
        ((scale * mean, scale * root), (scale * mean, -scale * root))
    }
}

/// Shift sum and product of an ad hoc 2x2 block built from the last subdiagonals
///
/// Used every tenth step on a block to break cycles of the standard shifts.
fn exceptional_shifts(h: &Array2, lo: usize, hi: usize) -> (f64, f64) {
    let mut s = h[[hi, hi - 1]].abs();
    if hi >= lo + 2 {
        s += h[[hi - 1, hi - 2]].abs();
    }
    let a = 0.75 * s + h[[hi, hi]];
    let b = -0.4375 * s;
    (2.0 * a, a * a - b * s)
}

/// Reflector I - tau v v^T with v = [1, v1, v2] mapping (x, y, z) to (beta, 0, 0)
///
/// Returns (tau, v1, v2, beta); `tau` is zero when (y, z) already vanish.
fn reflector3(x: f64, y: f64, z: f64) -> (f64, f64, f64, f64) {
    let tail = y.hypot(z);
    if tail == 0.0 {
        return (0.0, 0.0, 0.0, x);
    }
    let norm = x.hypot(tail);
    let beta = if x >= 0.0 { -norm } else { norm };
    let scale = 1.0 / (x - beta);
    ((beta - x) / beta, y * scale, z * scale, beta)
}

/// One implicit double-shift step on the window `lo..=hi` (at least 3x3)
///
/// The shifts are the roots of x^2 - sum * x + product. The first column of
/// (H - s1 I)(H - s2 I) starts a bulge that is chased down the subdiagonal.
fn francis_step(h: &mut Array2, lo: usize, hi: usize, sum: f64, product: f64) {
    let h00 = h[[lo, lo]];
    let h10 = h[[lo + 1, lo]];

    let mut x = h00 * h00 + h[[lo, lo + 1]] * h10 - sum * h00 + product;
    let mut y = h10 * (h00 + h[[lo + 1, lo + 1]] - sum);
    let mut z = h10 * h[[lo + 2, lo + 1]];

    for k in lo..hi {
        let three = k + 2 <= hi;
        if k > lo {
            x = h[[k, k - 1]];
            y = h[[k + 1, k - 1]];
            z = if three { h[[k + 2, k - 1]] } else { 0.0 };
        }

        let (tau, v1, v2, beta) = reflector3(x, y, z);
        if tau == 0.0 {
            continue;
        }
        if k > lo {
            h[[k, k - 1]] = beta;
            h[[k + 1, k - 1]] = 0.0;
            if three {
                h[[k + 2, k - 1]] = 0.0;
            }
        }

        for j in k..=hi {
            let mut s = h[[k, j]] + v1 * h[[k + 1, j]];
            if three {
                s += v2 * h[[k + 2, j]];
            }
            s *= tau;
            h[[k, j]] -= s;
            h[[k + 1, j]] -= s * v1;
            if three {
                h[[k + 2, j]] -= s * v2;
            }
        }

        let last = hi.min(k + 3);
        for i in lo..=last {
            let mut s = h[[i, k]] + v1 * h[[i, k + 1]];
            if three {
                s += v2 * h[[i, k + 2]];
            }
            s *= tau;
            h[[i, k]] -= s;
            h[[i, k + 1]] -= s * v1;
            if three {
                h[[i, k + 2]] -= s * v2;
            }
        }
    }
}
