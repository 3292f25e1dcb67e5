//! LU factorization with partial (row) pivoting
//!
//! The factorization is stored packed: the strictly lower part holds the unit
//! lower-triangular factor L, the upper part holds U. `pivots[k] = p` records
//! that rows `k` and `p` were swapped at step `k` (LAPACK `getrf` convention,
//! zero-based).

use crate::Array2;
use crate::config::KernelError;

/// Packed LU factorization with its row pivots
#[derive(Debug, Clone)]
pub struct LuFactors {
    /// Packed L (unit lower, diagonal implied) and U factors
    pub lu: Array2,
    /// Row interchanges, one per elimination step
    pub pivots: Vec<usize>,
}

impl LuFactors {
    /// Factor a copy of `matrix`
    pub fn factor(matrix: &Array2) -> Result<Self, KernelError> {
        let mut lu = matrix.clone();
        let pivots = lu_factor(&mut lu)?;
        Ok(Self { lu, pivots })
    }

    pub fn determinant(&self) -> f64 {
        lu_determinant(&self.lu, &self.pivots)
    }

    pub fn solve(&self, rhs: &mut [f64]) -> Result<(), KernelError> {
        lu_solve(&self.lu, &self.pivots, rhs)
    }

    pub fn inverse(&self) -> Result<Array2, KernelError> {
        lu_invert(&self.lu, &self.pivots)
    }
}

/// Factor `matrix` in place as P * A = L * U
///
/// Returns the pivot vector. If a pivot column is exactly zero the
/// factorization still runs to completion, but `KernelError::ZeroPivot` is
/// returned with the index of the first such column.
pub fn lu_factor(matrix: &mut Array2) -> Result<Vec<usize>, KernelError> {
    factor_in_place(matrix, None)
}

/// Factor in place, replacing pivots smaller than `floor` by `floor`
///
/// Used by inverse iteration, where `A - sigma*I` is singular by construction.
pub(crate) fn lu_factor_with_floor(matrix: &mut Array2, floor: f64) -> Result<Vec<usize>, KernelError> {
    factor_in_place(matrix, Some(floor))
}

fn factor_in_place(a: &mut Array2, floor: Option<f64>) -> Result<Vec<usize>, KernelError> {
    let (m, n) = *a.shape();
    if m != n {
        return Err(KernelError::NotSquare { rows: m, cols: n });
    }

    let mut pivots = vec![0; n];
    let mut first_zero = None;

    for k in 0..n {
        // Largest magnitude entry in column k on or below the diagonal
        let mut p = k;
        let mut max_val = a[[k, k]].abs();
        for i in (k + 1)..n {
            let val = a[[i, k]].abs();
            if val > max_val {
                max_val = val;
                p = i;
            }
        }
        pivots[k] = p;

        if p != k {
            for j in 0..n {
                let temp = a[[k, j]];
                a[[k, j]] = a[[p, j]];
                a[[p, j]] = temp;
            }
        }

        if let Some(floor) = floor {
            if a[[k, k]].abs() < floor {
                a[[k, k]] = if a[[k, k]] < 0.0 { -floor } else { floor };
            }
        }

        let pivot = a[[k, k]];
        if pivot == 0.0 {
            first_zero.get_or_insert(k);
            continue;
        }

        for i in (k + 1)..n {
            let factor = a[[i, k]] / pivot;
            a[[i, k]] = factor;
            if factor != 0.0 {
                for j in (k + 1)..n {
                    a[[i, j]] -= factor * a[[k, j]];
                }
            }
        }
    }

    match first_zero {
        Some(index) => Err(KernelError::ZeroPivot { index }),
        None => Ok(pivots),
    }
}

/// Determinant from a packed factorization
///
/// Product of the diagonal of U, negated once per actual row interchange.
pub fn lu_determinant(lu: &Array2, pivots: &[usize]) -> f64 {
    let n = pivots.len();
    let mut det = 1.0;
    for k in 0..n {
        det *= lu[[k, k]];
    }
    let swaps = pivots.iter().enumerate().filter(|&(k, &p)| p != k).count();
    if swaps % 2 == 1 { -det } else { det }
}

/// Solve A * x = rhs in place using a packed factorization
pub fn lu_solve(lu: &Array2, pivots: &[usize], rhs: &mut [f64]) -> Result<(), KernelError> {
    let n = pivots.len();
    if rhs.len() != n {
        return Err(KernelError::BadBuffer { rows: n, cols: 1, len: rhs.len() });
    }

    for (k, &p) in pivots.iter().enumerate() {
        if p != k {
            rhs.swap(k, p);
        }
    }

    // Forward substitution with unit L
    for i in 0..n {
        let mut sum = rhs[i];
        for j in 0..i {
            sum -= lu[[i, j]] * rhs[j];
        }
        rhs[i] = sum;
    }

    // Back substitution with U
    for i in (0..n).rev() {
        let diag = lu[[i, i]];
        if diag == 0.0 {
            return Err(KernelError::ZeroPivot { index: i });
        }
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= lu[[i, j]] * rhs[j];
        }
        rhs[i] = sum / diag;
    }

    Ok(())
}

/// Invert a matrix from its packed factorization
pub fn lu_invert(lu: &Array2, pivots: &[usize]) -> Result<Array2, KernelError> {
    let n = pivots.len();
    let mut inverse = Array2::from_elem((n, n), 0.0);
    let mut column = vec![0.0; n];

    for j in 0..n {
        column.iter_mut().for_each(|x| *x = 0.0);
        column[j] = 1.0;
        lu_solve(lu, pivots, &mut column)?;
        for i in 0..n {
            inverse[[i, j]] = column[i];
        }
    }

    Ok(inverse)
}
