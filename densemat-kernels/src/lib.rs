//! # densemat-kernels: portable dense linear algebra kernels
//!
//! Reference implementations of the heavy numeric routines used by `densemat`:
//! LU factorization with partial pivoting, Householder QR, one-sided Jacobi SVD
//! and a Hessenberg/shifted-QR eigenvalue solver for general real matrices.
//!
//! All kernels work on `mdarray` tensors in `f64` and favour clarity over speed.

pub mod config;
pub mod eigen;
pub mod lu;
pub mod qr;
pub mod svd;
pub mod utils;

pub use config::{KernelConfig, KernelError};
pub use eigen::{RealEigen, real_eigen};
pub use lu::{LuFactors, lu_determinant, lu_factor, lu_invert, lu_solve};
pub use qr::{HouseholderQr, householder_qr};
pub use svd::{FullSvd, jacobi_svd};
pub use utils::{eye, from_row_major, matmul, norm_frobenius, norm_max, to_row_major, transpose};

// Re-export mdarray types
pub use mdarray::Tensor;

/// Dense 2D tensor used by every kernel
pub type Array2 = Tensor<f64, (usize, usize)>;
