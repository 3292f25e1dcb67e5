//! Switching the global backend
//!
//! Kept in one test so no other test observes a foreign backend.

mod common;

use common::{SimpleRng, init_logger, random_matrix, random_well_conditioned};
use densemat::backend::{CBLAS_NO_TRANS, CBLAS_ROW_MAJOR};
use densemat::{
    KernelConfig, Matrix, ReferenceBackend, backend_name, clear_backend, set_backend, set_blas_backend,
    use_reference_backend,
};

/// Row-major CBLAS dgemm stand-in
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

fn exercise_backend(expected_name: &str) {
    assert_eq!(backend_name(), expected_name);

    let mut rng = SimpleRng::new(31);
    let a = random_matrix(&mut rng, 4, 3);
    let b = random_matrix(&mut rng, 3, 5);
    let c = (&a * &b).unwrap();
    let expected = Matrix::from_fn(4, 5, |i, j| (0..3).map(|l| a[(i, l)] * b[(l, j)]).sum());
    assert!(c.approx_eq(&expected, 1e-14));

    let sq = random_well_conditioned(&mut rng, 5);
    let inv = sq.inverse().unwrap().unwrap();
    assert!((&sq * &inv).unwrap().approx_eq(&Matrix::identity(5), 1e-12));

    let svd = a.svd().unwrap();
    let usv = (&(&svd.u * &svd.s).unwrap() * &svd.vt).unwrap();
    assert!(usv.approx_eq(&a, 1e-12));
}

#[test]
fn test_switch_backends() {
    init_logger();

    exercise_backend("Faer (Pure Rust)");

    use_reference_backend();
    exercise_backend("Reference (densemat-kernels)");

    set_backend(Box::new(ReferenceBackend::with_config(KernelConfig::new(50, 100, 4))));
    exercise_backend("Reference (densemat-kernels)");

    unsafe {
        set_blas_backend(naive_dgemm);
    }
    exercise_backend("External BLAS (LP64)");

    clear_backend();
    exercise_backend("Faer (Pure Rust)");
}
