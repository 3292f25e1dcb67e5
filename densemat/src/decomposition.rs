//! Determinant, inverse, QR, eigen and singular value decompositions
//!
//! Every operation exists twice: as a `Matrix` method running on the active
//! backend, and as a `*_with` function taking the backend explicitly.

use crate::algebra::matrix_product_with;
use crate::backend::{NumericBackend, with_backend};
use crate::error::{BackendError, MatrixError, Result};
use crate::matrix::Matrix;
use num_complex::Complex;

/// Q (rows x columns, orthonormal columns) and R (columns x columns) with Q * R = A
#[derive(Debug, Clone, PartialEq)]
pub struct QrDecomposition {
    pub q: Matrix,
    pub r: Matrix,
}

/// Eigenvalues with their right eigenvectors
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Real parts, in backend order
    pub eigenvalues: Vec<f64>,
    /// n x 1 eigenvectors (real parts), matched to `eigenvalues`
    pub eigenvectors: Vec<Matrix>,
    /// Full eigenvalues including imaginary parts
    pub complex_eigenvalues: Vec<Complex<f64>>,
}

impl EigenDecomposition {
    /// True if any eigenvalue had a nonzero imaginary part
    pub fn has_complex_spectrum(&self) -> bool {
        self.complex_eigenvalues.iter().any(|z| z.im != 0.0)
    }
}

/// Full SVD: U (m x m), S (m x n, descending diagonal), VT (n x n)
#[derive(Debug, Clone, PartialEq)]
pub struct SingularValueDecomposition {
    pub u: Matrix,
    pub s: Matrix,
    pub vt: Matrix,
}

impl SingularValueDecomposition {
    /// Singular values along the diagonal of `s`
    pub fn singular_values(&self) -> Vec<f64> {
        (0..self.s.rows.min(self.s.columns)).map(|k| self.s[(k, k)]).collect()
    }
}

fn require_square(a: &Matrix) -> Result<usize> {
    if a.rows != a.columns {
        return Err(MatrixError::NotSquare { rows: a.rows, columns: a.columns });
    }
    Ok(a.rows)
}

/// Determinant via LU with partial pivoting
///
/// Sizes up to 2 use closed forms. An exact zero pivot gives `0.0`.
pub fn determinant_with(backend: &dyn NumericBackend, a: &Matrix) -> Result<f64> {
    let n = require_square(a)?;
    let e = &a.elements;
    match n {
        0 => return Ok(1.0),
        1 => return Ok(e[0]),
        2 => return Ok(e[0] * e[3] - e[1] * e[2]),
        _ => {}
    }

    log::debug!("determinant: {}x{} on {}", n, n, backend.name());
    let mut lu = e.clone();
    let pivots = match backend.lu_factor(n, &mut lu) {
        Ok(pivots) => pivots,
        Err(BackendError::ZeroPivot { .. }) => return Ok(0.0),
        Err(err) => return Err(err.into()),
    };

    let mut det: f64 = (0..n).map(|k| lu[k * n + k]).product();
    for (k, &p) in pivots.iter().enumerate() {
        if p != k {
            det = -det;
        }
    }
    Ok(det)
}

/// Inverse via LU, `None` when the matrix is numerically singular
///
/// A pivot with magnitude at most `n * eps * max|a_ij|` counts as singular, as
/// does a NaN or infinite pivot.
pub fn inverse_with(backend: &dyn NumericBackend, a: &Matrix) -> Result<Option<Matrix>> {
    let n = require_square(a)?;
    if n == 0 {
        return Ok(Some(Matrix::zeros(0, 0)));
    }

    log::debug!("inverse: {}x{} on {}", n, n, backend.name());
    let mut lu = a.elements.clone();
    let pivots = match backend.lu_factor(n, &mut lu) {
        Ok(pivots) => pivots,
        Err(BackendError::ZeroPivot { index }) => {
            log::debug!("inverse: zero pivot at {}", index);
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let scale = a.elements.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let threshold = n as f64 * f64::EPSILON * scale;
    if let Some(k) = (0..n).find(|&k| !(lu[k * n + k].is_finite() && lu[k * n + k].abs() > threshold)) {
        log::debug!("inverse: pivot {} below threshold {:e}", k, threshold);
        return Ok(None);
    }

    match backend.lu_invert(n, &lu, &pivots) {
        Ok(elements) => Ok(Some(Matrix { rows: n, columns: n, elements })),
        Err(BackendError::ZeroPivot { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// QR by modified Gram-Schmidt
///
/// Columns that become zero during orthogonalization stay zero in Q.
pub fn qr_with(backend: &dyn NumericBackend, a: &Matrix) -> Result<QrDecomposition> {
    let (m, n) = a.shape();
    if m < n {
        return Err(MatrixError::TooFewRows { rows: m, columns: n });
    }

    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut v: Vec<f64> = (0..m).map(|r| a.elements[r * n + i]).collect();
        for q in &basis {
            let qq = backend.dot(q, q);
            if qq == 0.0 {
                continue;
            }
            let coefficient = backend.dot(&v, q) / qq;
            for (vr, qr) in v.iter_mut().zip(q) {
                *vr -= coefficient * qr;
            }
        }
        basis.push(v);
    }

    for q in &mut basis {
        let norm = backend.dot(q, q).sqrt();
        if norm > 0.0 {
            q.iter_mut().for_each(|x| *x /= norm);
        }
    }

    let q = Matrix::from_fn(m, n, |r, c| basis[c][r]);
    let mut qt = vec![0.0; m * n];
    backend.transpose(m, n, &q.elements, &mut qt);
    let qt = Matrix { rows: n, columns: m, elements: qt };
    let r = matrix_product_with(backend, &qt, a)?;

    Ok(QrDecomposition { q, r })
}

/// Eigen-decomposition of a general real square matrix
///
/// Imaginary parts are dropped from `eigenvalues` and `eigenvectors` (logged
/// as a warning) but kept in `complex_eigenvalues`.
pub fn eigen_with(backend: &dyn NumericBackend, a: &Matrix) -> Result<EigenDecomposition> {
    let n = require_square(a)?;
    if n == 0 {
        return Ok(EigenDecomposition {
            eigenvalues: Vec::new(),
            eigenvectors: Vec::new(),
            complex_eigenvalues: Vec::new(),
        });
    }

    log::debug!("eigen: {}x{} on {}", n, n, backend.name());
    let output = backend.eigen(n, &a.elements)?;

    let eigenvalues: Vec<f64> = output.values.iter().map(|z| z.re).collect();
    let eigenvectors = (0..n)
        .map(|k| Matrix::from_fn(n, 1, |i, _| output.vectors[i * n + k]))
        .collect();

    let complex = output.values.iter().filter(|z| z.im != 0.0).count();
    if complex > 0 {
        log::warn!("eigen: discarding imaginary parts of {} eigenvalues", complex);
    }

    Ok(EigenDecomposition { eigenvalues, eigenvectors, complex_eigenvalues: output.values })
}

/// Full singular value decomposition
pub fn svd_with(backend: &dyn NumericBackend, a: &Matrix) -> Result<SingularValueDecomposition> {
    let (m, n) = a.shape();
    if m == 0 || n == 0 {
        return Ok(SingularValueDecomposition {
            u: Matrix::identity(m),
            s: Matrix::zeros(m, n),
            vt: Matrix::identity(n),
        });
    }

    log::debug!("svd: {}x{} on {}", m, n, backend.name());
    let output = backend.svd(m, n, &a.elements)?;

    let mut s = Matrix::zeros(m, n);
    for (k, &sigma) in output.s.iter().enumerate() {
        s.elements[k * n + k] = sigma;
    }
    Ok(SingularValueDecomposition {
        u: Matrix { rows: m, columns: m, elements: output.u },
        s,
        vt: Matrix { rows: n, columns: n, elements: output.vt },
    })
}

impl Matrix {
    pub fn determinant(&self) -> Result<f64> {
        with_backend(|backend| determinant_with(backend, self))
    }

    /// `Ok(None)` when the matrix is singular
    pub fn inverse(&self) -> Result<Option<Matrix>> {
        with_backend(|backend| inverse_with(backend, self))
    }

    pub fn qr(&self) -> Result<QrDecomposition> {
        with_backend(|backend| qr_with(backend, self))
    }

    pub fn eigen(&self) -> Result<EigenDecomposition> {
        with_backend(|backend| eigen_with(backend, self))
    }

    pub fn svd(&self) -> Result<SingularValueDecomposition> {
        with_backend(|backend| svd_with(backend, self))
    }
}

#[cfg(test)]
#[path = "decomposition_tests.rs"]
mod decomposition_tests;
