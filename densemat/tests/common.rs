//! Common test utilities

#![allow(dead_code)]

use densemat::Matrix;

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

/// Random matrix with entries in [-1, 1)
pub fn random_matrix(rng: &mut SimpleRng, rows: usize, columns: usize) -> Matrix {
    Matrix::from_fn(rows, columns, |_, _| rng.next_signed())
}

/// Random matrix made diagonally dominant, hence well conditioned
pub fn random_well_conditioned(rng: &mut SimpleRng, n: usize) -> Matrix {
    Matrix::from_fn(n, n, |i, j| {
        let x = rng.next_signed();
        if i == j { x + n as f64 } else { x }
    })
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
