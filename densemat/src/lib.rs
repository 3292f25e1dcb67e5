//! # densemat: dense real matrices
//!
//! A row-major `f64` matrix value type with fancy indexing, elementwise and
//! scalar arithmetic, matrix algebra and decompositions (determinant,
//! inverse, QR, eigen, SVD).
//!
//! Heavy kernels run on a pluggable [`backend::NumericBackend`]. The default
//! is pure Rust `faer`; `densemat-kernels` provides a portable reference
//! backend and an external CBLAS `dgemm` can be injected at runtime.
//!
//! ```ignore
//! use densemat::Matrix;
//!
//! let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
//! let inv = a.inverse()?.expect("invertible");
//! assert!((&a * &inv)?.approx_eq(&Matrix::identity(2), 1e-12));
//! ```

pub mod algebra;
pub mod backend;
pub mod decomposition;
pub mod elementwise;
pub mod error;
pub mod index;
pub mod matrix;
pub mod mdarray_compat;
pub mod ops;

pub use algebra::{Dimension, matrix_product_with};
pub use backend::{
    ElementwiseOp, ExternalBlasBackend, FaerBackend, NumericBackend, ReferenceBackend, backend_name,
    clear_backend, set_backend, set_blas_backend, use_reference_backend,
};
pub use decomposition::{
    EigenDecomposition, QrDecomposition, SingularValueDecomposition, determinant_with, eigen_with,
    inverse_with, qr_with, svd_with,
};
pub use error::{Axis, BackendError, MatrixError, Result};
pub use index::IndexSelector;
pub use matrix::{EQUALITY_TOLERANCE, Matrix};

// Re-export dependencies used in the public API
pub use densemat_kernels::KernelConfig;
pub use num_complex::Complex;
