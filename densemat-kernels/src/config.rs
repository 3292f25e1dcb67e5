//! Kernel configuration and error types

/// Iteration limits shared by the iterative kernels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Maximum number of Jacobi sweeps for the SVD
    pub max_sweeps: usize,
    /// Maximum number of double-shift QR steps spent before each deflation
    pub max_qr_iterations: usize,
    /// Number of inverse iteration solves per eigenvector
    pub inverse_iterations: usize,
}

impl KernelConfig {
    pub fn new(max_sweeps: usize, max_qr_iterations: usize, inverse_iterations: usize) -> Self {
        Self {
            max_sweeps,
            max_qr_iterations,
            inverse_iterations,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(30, 60, 3)
    }
}

/// Error types for kernel computation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Exact zero pivot at index {index}")]
    ZeroPivot { index: usize },

    #[error("Convergence failed after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Buffer of length {len} cannot hold a {rows}x{cols} matrix")]
    BadBuffer { rows: usize, cols: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KernelConfig::default();
        assert_eq!(config.max_sweeps, 30);
        assert_eq!(config.max_qr_iterations, 60);
        assert_eq!(config.inverse_iterations, 3);
    }

    #[test]
    fn test_error_messages() {
        let err = KernelError::ZeroPivot { index: 2 };
        assert_eq!(err.to_string(), "Exact zero pivot at index 2");

        let err = KernelError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "Matrix must be square, got 2x3");
    }
}
