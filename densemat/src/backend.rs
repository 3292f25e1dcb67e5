//! Numeric backends with runtime selection
//!
//! Heavy kernels (matrix product, LU, eigen, SVD) are routed through the
//! [`NumericBackend`] trait. A process-wide dispatcher holds the active
//! backend and can be switched at runtime.
//!
//! # Design
//! - **Default**: `FaerBackend`, pure Rust via `faer`
//! - **Reference**: `ReferenceBackend`, portable kernels from `densemat-kernels`
//! - **Optional**: external CBLAS `dgemm` via function pointer injection
//! - **Thread-safe**: global dispatcher protected by `RwLock`
//!
//! # Example
//! ```ignore
//! use densemat::backend::{set_blas_backend, use_reference_backend, clear_backend};
//!
//! use_reference_backend();
//! unsafe {
//!     set_blas_backend(cblas_dgemm as _);
//! }
//! clear_backend(); // back to faer
//! ```

use crate::error::BackendError;
use densemat_kernels::{self as kernels, KernelConfig};
use num_complex::Complex;
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock};

//==============================================================================
// BLAS Function Pointer Type
//==============================================================================

/// CBLAS dgemm function pointer type (LP64: 32-bit integers)
///
/// ```c
/// void cblas_dgemm(
///     CblasOrder order,          // 101 (RowMajor) or 102 (ColMajor)
///     CblasTranspose transa,     // 111 (NoTrans), 112 (Trans)
///     CblasTranspose transb,
///     int m, int n, int k,
///     double alpha,
///     const double *a, int lda,
///     const double *b, int ldb,
///     double beta,
///     double *c, int ldc
/// );
/// ```
pub type DgemmFnPtr = unsafe extern "C" fn(
    order: libc::c_int,
    transa: libc::c_int,
    transb: libc::c_int,
    m: libc::c_int,
    n: libc::c_int,
    k: libc::c_int,
    alpha: libc::c_double,
    a: *const libc::c_double,
    lda: libc::c_int,
    b: *const libc::c_double,
    ldb: libc::c_int,
    beta: libc::c_double,
    c: *mut libc::c_double,
    ldc: libc::c_int,
);

pub const CBLAS_ROW_MAJOR: libc::c_int = 101;
pub const CBLAS_NO_TRANS: libc::c_int = 111;

//==============================================================================
// Backend Trait
//==============================================================================

/// Binary elementwise kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementwiseOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl ElementwiseOp {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ElementwiseOp::Add => a + b,
            ElementwiseOp::Subtract => a - b,
            ElementwiseOp::Multiply => a * b,
            ElementwiseOp::Divide => a / b,
            ElementwiseOp::Power => a.powf(b),
        }
    }
}

/// Eigenvalues and eigenvectors of an n x n matrix
#[derive(Debug, Clone)]
pub struct EigenOutput {
    pub values: Vec<Complex<f64>>,
    /// n x n row-major; column k belongs to `values[k]`
    pub vectors: Vec<f64>,
}

/// Full SVD of an m x n matrix
#[derive(Debug, Clone)]
pub struct SvdOutput {
    /// m x m row-major
    pub u: Vec<f64>,
    /// min(m, n) values, descending
    pub s: Vec<f64>,
    /// n x n row-major
    pub vt: Vec<f64>,
}

/// Numeric backend for runtime dispatch
///
/// All matrices are passed as row-major slices.
pub trait NumericBackend: Send + Sync {
    /// out = a^T for a rows x columns `a`
    fn transpose(&self, rows: usize, columns: usize, a: &[f64], out: &mut [f64]) {
        for i in 0..rows {
            for j in 0..columns {
                out[j * rows + i] = a[i * columns + j];
            }
        }
    }

    fn dot(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    fn elementwise(&self, op: ElementwiseOp, a: &[f64], b: &[f64], out: &mut [f64]) {
        for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
            *o = op.apply(x, y);
        }
    }

    /// C = A * B with A m x k and B k x n
    ///
    /// Backends without a product kernel return `Unsupported`; callers then
    /// fall back to a plain triple loop.
    fn dgemm(&self, _m: usize, _n: usize, _k: usize, _a: &[f64], _b: &[f64], _c: &mut [f64]) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("dgemm"))
    }

    /// Factor the n x n matrix `a` in place as P * A = L * U
    ///
    /// On success `a` holds L (unit diagonal, strictly below) and U (on and
    /// above the diagonal). The returned pivots follow the LAPACK convention:
    /// row `k` was swapped with row `pivots[k]` at step `k`.
    fn lu_factor(&self, n: usize, a: &mut [f64]) -> Result<Vec<usize>, BackendError>;

    /// Inverse of the matrix whose packed factorization is (`lu`, `pivots`)
    fn lu_invert(&self, n: usize, lu: &[f64], pivots: &[usize]) -> Result<Vec<f64>, BackendError> {
        let packed = kernels::from_row_major(n, n, lu)?;
        let inverse = kernels::lu_invert(&packed, pivots)?;
        Ok(kernels::to_row_major(&inverse))
    }

    /// Eigen-decomposition of a general real n x n matrix
    fn eigen(&self, n: usize, a: &[f64]) -> Result<EigenOutput, BackendError>;

    /// Full SVD of an m x n matrix
    fn svd(&self, m: usize, n: usize, a: &[f64]) -> Result<SvdOutput, BackendError>;

    /// Returns backend name for debugging
    fn name(&self) -> &'static str;
}

//==============================================================================
// Reference Backend (densemat-kernels)
//==============================================================================

/// Portable backend on top of `densemat-kernels`
///
/// Provides no product kernel, so matrix products use the core triple loop.
#[derive(Debug, Clone, Default)]
pub struct ReferenceBackend {
    config: KernelConfig,
}

impl ReferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

impl NumericBackend for ReferenceBackend {
    fn lu_factor(&self, n: usize, a: &mut [f64]) -> Result<Vec<usize>, BackendError> {
        let mut packed = kernels::from_row_major(n, n, a)?;
        let pivots = kernels::lu_factor(&mut packed)?;
        a.copy_from_slice(&kernels::to_row_major(&packed));
        Ok(pivots)
    }

    fn eigen(&self, n: usize, a: &[f64]) -> Result<EigenOutput, BackendError> {
        let matrix = kernels::from_row_major(n, n, a)?;
        let eig = kernels::real_eigen(&matrix, &self.config)?;
        let values = eig
            .values_re
            .iter()
            .zip(&eig.values_im)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect();
        Ok(EigenOutput { values, vectors: kernels::to_row_major(&eig.vectors) })
    }

    fn svd(&self, m: usize, n: usize, a: &[f64]) -> Result<SvdOutput, BackendError> {
        let matrix = kernels::from_row_major(m, n, a)?;
        let svd = kernels::jacobi_svd(&matrix, &self.config)?;
        Ok(SvdOutput {
            u: kernels::to_row_major(&svd.u),
            s: svd.s,
            vt: kernels::to_row_major(&svd.vt),
        })
    }

    fn name(&self) -> &'static str {
        "Reference (densemat-kernels)"
    }
}

//==============================================================================
// Faer Backend (Default, Pure Rust)
//==============================================================================

/// Default Faer backend (Pure Rust, no external dependencies)
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerBackend;

fn faer_mat(rows: usize, columns: usize, a: &[f64]) -> faer::Mat<f64> {
    faer::Mat::from_fn(rows, columns, |i, j| a[i * columns + j])
}

/// LAPACK-style swap sequence for a row permutation
///
/// `perm[i]` is the original row that ends up at position `i`.
fn swaps_from_permutation(perm: &[usize]) -> Vec<usize> {
    let n = perm.len();
    let mut rows: Vec<usize> = (0..n).collect();
    let mut position: Vec<usize> = (0..n).collect();
    let mut pivots = vec![0; n];

    for i in 0..n {
        let p = position[perm[i]];
        pivots[i] = p;
        let (row_i, row_p) = (rows[i], rows[p]);
        rows.swap(i, p);
        position[row_i] = p;
        position[row_p] = i;
    }
    pivots
}

impl NumericBackend for FaerBackend {
    fn dgemm(&self, m: usize, n: usize, k: usize, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<(), BackendError> {
        let product = &faer_mat(m, k, a) * &faer_mat(k, n, b);
        for i in 0..m {
            for j in 0..n {
                c[i * n + j] = product[(i, j)];
            }
        }
        Ok(())
    }

    fn lu_factor(&self, n: usize, a: &mut [f64]) -> Result<Vec<usize>, BackendError> {
        let mat = faer_mat(n, n, a);
        let lu = mat.as_ref().partial_piv_lu();
        let l = lu.L().to_owned();
        let u = lu.U().to_owned();
        let (fwd, _) = lu.P().arrays();
        let pivots = swaps_from_permutation(fwd);

        for i in 0..n {
            for j in 0..n {
                a[i * n + j] = if i > j { l[(i, j)] } else { u[(i, j)] };
            }
        }

        match (0..n).find(|&k| a[k * n + k] == 0.0) {
            Some(index) => Err(BackendError::ZeroPivot { index }),
            None => Ok(pivots),
        }
    }

    fn eigen(&self, n: usize, a: &[f64]) -> Result<EigenOutput, BackendError> {
        let mat = faer_mat(n, n, a);
        let evd = mat
            .as_ref()
            .eigen()
            .map_err(|e| BackendError::Failed(format!("faer eigen: {:?}", e)))?;

        let values = evd
            .S()
            .column_vector()
            .iter()
            .map(|z| Complex::new(z.re, z.im))
            .collect();
        let u = evd.U().to_owned();
        let mut vectors = vec![0.0; n * n];
        for i in 0..n {
            for k in 0..n {
                vectors[i * n + k] = u[(i, k)].re;
            }
        }
        Ok(EigenOutput { values, vectors })
    }

    fn svd(&self, m: usize, n: usize, a: &[f64]) -> Result<SvdOutput, BackendError> {
        let mat = faer_mat(m, n, a);
        let svd = mat
            .as_ref()
            .svd()
            .map_err(|e| BackendError::Failed(format!("faer svd: {:?}", e)))?;

        let u = svd.U().to_owned();
        let v = svd.V().to_owned();
        let s: Vec<f64> = svd.S().column_vector().iter().copied().collect();

        // Order singular triplets by descending value
        let mut order: Vec<usize> = (0..s.len()).collect();
        order.sort_by(|&x, &y| s[y].total_cmp(&s[x]));

        let mut out = SvdOutput { u: vec![0.0; m * m], s: order.iter().map(|&k| s[k]).collect(), vt: vec![0.0; n * n] };
        for i in 0..m {
            for j in 0..m {
                let col = if j < order.len() { order[j] } else { j };
                out.u[i * m + j] = u[(i, col)];
            }
        }
        for i in 0..n {
            let col = if i < order.len() { order[i] } else { i };
            for j in 0..n {
                out.vt[i * n + j] = v[(j, col)];
            }
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "Faer (Pure Rust)"
    }
}

//==============================================================================
// External BLAS Backend
//==============================================================================

/// External CBLAS dgemm, reference kernels for everything else
pub struct ExternalBlasBackend {
    dgemm: DgemmFnPtr,
    fallback: ReferenceBackend,
}

impl ExternalBlasBackend {
    /// # Safety
    /// `dgemm` must follow the CBLAS calling convention and stay valid for
    /// the lifetime of the backend.
    pub unsafe fn new(dgemm: DgemmFnPtr) -> Self {
        Self { dgemm, fallback: ReferenceBackend::default() }
    }
}

fn blas_int(value: usize, what: &str) -> Result<libc::c_int, BackendError> {
    libc::c_int::try_from(value)
        .map_err(|_| BackendError::Failed(format!("dimension {} = {} too large for LP64 BLAS", what, value)))
}

impl NumericBackend for ExternalBlasBackend {
    fn dgemm(&self, m: usize, n: usize, k: usize, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<(), BackendError> {
        if m == 0 || n == 0 {
            return Ok(());
        }
        if k == 0 {
            c.iter_mut().for_each(|x| *x = 0.0);
            return Ok(());
        }
        let (mi, ni, ki) = (blas_int(m, "m")?, blas_int(n, "n")?, blas_int(k, "k")?);

        unsafe {
            (self.dgemm)(
                CBLAS_ROW_MAJOR,
                CBLAS_NO_TRANS,
                CBLAS_NO_TRANS,
                mi,
                ni,
                ki,
                1.0, // alpha
                a.as_ptr(),
                ki, // lda
                b.as_ptr(),
                ni, // ldb
                0.0, // beta
                c.as_mut_ptr(),
                ni, // ldc
            );
        }
        Ok(())
    }

    fn lu_factor(&self, n: usize, a: &mut [f64]) -> Result<Vec<usize>, BackendError> {
        self.fallback.lu_factor(n, a)
    }

    fn eigen(&self, n: usize, a: &[f64]) -> Result<EigenOutput, BackendError> {
        self.fallback.eigen(n, a)
    }

    fn svd(&self, m: usize, n: usize, a: &[f64]) -> Result<SvdOutput, BackendError> {
        self.fallback.svd(m, n, a)
    }

    fn name(&self) -> &'static str {
        "External BLAS (LP64)"
    }
}

//==============================================================================
// Global Dispatcher
//==============================================================================

/// Global backend dispatcher (thread-safe)
static BACKEND_DISPATCHER: Lazy<RwLock<Box<dyn NumericBackend>>> =
    Lazy::new(|| RwLock::new(Box::new(FaerBackend)));

/// Replace the active backend
pub fn set_backend(backend: Box<dyn NumericBackend>) {
    log::info!("Switching numeric backend to {}", backend.name());
    let mut dispatcher = BACKEND_DISPATCHER.write().unwrap_or_else(PoisonError::into_inner);
    *dispatcher = backend;
}

/// Use the portable `densemat-kernels` backend with default settings
pub fn use_reference_backend() {
    set_backend(Box::new(ReferenceBackend::default()));
}

/// Set an external CBLAS dgemm (LP64: 32-bit integers)
///
/// # Safety
/// - Function pointer must be valid and thread-safe
/// - Must remain valid for the lifetime of the program
/// - Must follow CBLAS calling convention
///
/// # Example
/// ```ignore
/// unsafe {
///     set_blas_backend(cblas_dgemm as _);
/// }
/// ```
pub unsafe fn set_blas_backend(dgemm: DgemmFnPtr) {
    set_backend(Box::new(ExternalBlasBackend::new(dgemm)));
}

/// Reset the dispatcher to the default Faer backend
pub fn clear_backend() {
    set_backend(Box::new(FaerBackend));
}

/// Name of the active backend
pub fn backend_name() -> &'static str {
    BACKEND_DISPATCHER.read().unwrap_or_else(PoisonError::into_inner).name()
}

/// Run `f` against the active backend while holding the read lock
pub fn with_backend<R>(f: impl FnOnce(&dyn NumericBackend) -> R) -> R {
    let dispatcher = BACKEND_DISPATCHER.read().unwrap_or_else(PoisonError::into_inner);
    f(dispatcher.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const A: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const B: [f64; 6] = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];

    /// Row-major, no-transpose CBLAS dgemm stand-in
    unsafe extern "C" fn naive_dgemm(
        order: libc::c_int,
        transa: libc::c_int,
        transb: libc::c_int,
        m: libc::c_int,
        n: libc::c_int,
        k: libc::c_int,
        alpha: libc::c_double,
        a: *const libc::c_double,
        lda: libc::c_int,
        b: *const libc::c_double,
        ldb: libc::c_int,
        beta: libc::c_double,
        c: *mut libc::c_double,
        ldc: libc::c_int,
    ) {
        assert_eq!(order, CBLAS_ROW_MAJOR);
        assert_eq!((transa, transb), (CBLAS_NO_TRANS, CBLAS_NO_TRANS));
        let (m, n, k) = (m as usize, n as usize, k as usize);
        let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0;
                for l in 0..k {
                    sum += unsafe { *a.add(i * lda + l) * *b.add(l * ldb + j) };
                }
                unsafe {
                    let cij = c.add(i * ldc + j);
                    *cij = alpha * sum + beta * *cij;
                }
            }
        }
    }

    #[test]
    fn test_elementwise_ops() {
        assert_eq!(ElementwiseOp::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(ElementwiseOp::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(ElementwiseOp::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(ElementwiseOp::Divide.apply(3.0, 2.0), 1.5);
        assert_eq!(ElementwiseOp::Power.apply(2.0, 3.0), 8.0);
    }

    #[test]
    fn test_reference_backend_has_no_dgemm() {
        let mut c = [0.0; 4];
        assert_eq!(
            ReferenceBackend::new().dgemm(2, 2, 3, &A, &B, &mut c),
            Err(BackendError::Unsupported("dgemm"))
        );
    }

    #[test]
    fn test_faer_dgemm() {
        let mut c = [0.0; 4];
        FaerBackend.dgemm(2, 2, 3, &A, &B, &mut c).unwrap();
        assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_external_blas_dgemm() {
        let backend = unsafe { ExternalBlasBackend::new(naive_dgemm) };
        let mut c = [0.0; 4];
        backend.dgemm(2, 2, 3, &A, &B, &mut c).unwrap();
        assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
        assert_eq!(backend.name(), "External BLAS (LP64)");

        let mut empty_k = [1.0; 4];
        backend.dgemm(2, 2, 0, &[], &[], &mut empty_k).unwrap();
        assert_eq!(empty_k, [0.0; 4]);
    }

    #[test]
    fn test_swaps_from_permutation() {
        assert_eq!(swaps_from_permutation(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(swaps_from_permutation(&[2, 0, 1]), vec![2, 2, 2]);

        // Replaying the swaps reproduces the permutation
        let perm = [3, 1, 0, 2];
        let pivots = swaps_from_permutation(&perm);
        let mut rows: Vec<usize> = (0..4).collect();
        for (k, &p) in pivots.iter().enumerate() {
            rows.swap(k, p);
        }
        assert_eq!(rows, perm);
    }

    #[test]
    fn test_lu_factor_backends_agree_on_determinant() {
        let a = [2.0, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0];
        let backends: [&dyn NumericBackend; 2] = [&ReferenceBackend::new(), &FaerBackend];
        for backend in backends {
            let mut lu = a;
            let pivots = backend.lu_factor(3, &mut lu).unwrap();
            let mut det: f64 = (0..3).map(|k| lu[k * 3 + k]).product();
            for (k, &p) in pivots.iter().enumerate() {
                if p != k {
                    det = -det;
                }
            }
            assert_abs_diff_eq!(det, -16.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lu_factor_zero_pivot() {
        let backends: [&dyn NumericBackend; 2] = [&ReferenceBackend::new(), &FaerBackend];
        for backend in backends {
            let mut lu = [1.0, 2.0, 2.0, 4.0];
            assert!(matches!(backend.lu_factor(2, &mut lu), Err(BackendError::ZeroPivot { .. })));
        }
    }

    #[test]
    fn test_svd_descending() {
        let a = [3.0, 0.0, 0.0, 0.0, 5.0, 0.0];
        let backends: [&dyn NumericBackend; 2] = [&ReferenceBackend::new(), &FaerBackend];
        for backend in backends {
            let svd = backend.svd(2, 3, &a).unwrap();
            assert_eq!(svd.u.len(), 4);
            assert_eq!(svd.vt.len(), 9);
            assert_abs_diff_eq!(svd.s[0], 5.0, epsilon = 1e-12);
            assert_abs_diff_eq!(svd.s[1], 3.0, epsilon = 1e-12);
        }
    }
}
