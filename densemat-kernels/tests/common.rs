//! Common test utilities

use densemat_kernels::Array2;
use mdarray::Tensor;

/// Simple deterministic pseudo-random number generator (LCG)
///
/// Uses the Numerical Recipes parameters a = 1664525, c = 1013904223.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        ((self.state >> 16) as f64) / ((1u64 << 48) as f64)
    }

    /// Next f64 in [-1, 1)
    pub fn next_signed(&mut self) -> f64 {
        2.0 * self.next_f64() - 1.0
    }
}

/// Random m x n matrix with entries in [-1, 1)
pub fn random_matrix(rng: &mut SimpleRng, m: usize, n: usize) -> Array2 {
    Tensor::from_fn((m, n), |_| rng.next_signed())
}

/// Hilbert matrix H[i,j] = 1 / (i + j + 1)
pub fn hilbert(n: usize) -> Array2 {
    Tensor::from_fn((n, n), |idx| 1.0 / ((idx[0] + idx[1] + 1) as f64))
}

/// Largest absolute entrywise difference
pub fn max_abs_diff(a: &Array2, b: &Array2) -> f64 {
    let (m, n) = *a.shape();
    assert_eq!((m, n), *b.shape());
    let mut max = 0.0_f64;
    for i in 0..m {
        for j in 0..n {
            max = max.max((a[[i, j]] - b[[i, j]]).abs());
        }
    }
    max
}
