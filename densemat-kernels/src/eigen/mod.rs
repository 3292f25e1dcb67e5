//! Eigen-decomposition of general real square matrices
//!
//! Eigenvalues come from Hessenberg reduction followed by Francis double-shift
//! QR with deflation. Eigenvectors are recovered per real part by inverse iteration on
//! the original matrix, so complex pairs get the real eigenvector closest to
//! their real part.

pub mod hessenberg;
pub mod inverse_iteration;
pub mod shifted_qr;

pub use hessenberg::hessenberg;
pub use inverse_iteration::inverse_iteration;
pub use shifted_qr::hessenberg_eigenvalues;

use crate::Array2;
use crate::config::{KernelConfig, KernelError};
use mdarray::Tensor;

/// Eigenvalues and eigenvectors of a real square matrix
#[derive(Debug, Clone)]
pub struct RealEigen {
    /// Real parts of the eigenvalues
    pub values_re: Vec<f64>,
    /// Imaginary parts of the eigenvalues (zero for real eigenvalues)
    pub values_im: Vec<f64>,
    /// Column `k` is the unit eigenvector for eigenvalue `k`
    pub vectors: Array2,
}

impl RealEigen {
    /// True if any eigenvalue has a nonzero imaginary part
    pub fn is_complex(&self) -> bool {
        self.values_im.iter().any(|&im| im != 0.0)
    }
}

/// Compute eigenvalues and eigenvectors of `matrix`
pub fn real_eigen(matrix: &Array2, config: &KernelConfig) -> Result<RealEigen, KernelError> {
    let (m, n) = *matrix.shape();
    if m != n {
        return Err(KernelError::NotSquare { rows: m, cols: n });
    }

    if n == 0 {
        return Ok(RealEigen {
            values_re: Vec::new(),
            values_im: Vec::new(),
            vectors: Tensor::from_elem((0, 0), 0.0),
        });
    }

    let mut h = hessenberg(matrix);
    let (values_re, values_im) = hessenberg_eigenvalues(&mut h, config.max_qr_iterations)?;

    let mut vectors = Tensor::from_elem((n, n), 0.0);
    for (k, &lambda) in values_re.iter().enumerate() {
        let v = inverse_iteration(matrix, lambda, k, config.inverse_iterations)?;
        for (i, &vi) in v.iter().enumerate() {
            vectors[[i, k]] = vi;
        }
    }

    log::debug!(
        "real_eigen: n={}, complex pairs={}",
        n,
        values_im.iter().filter(|&&im| im > 0.0).count()
    );

    Ok(RealEigen { values_re, values_im, vectors })
}
