//! Operator overloads layered over the named operations
//!
//! | operator            | operation                         |
//! |---------------------|-----------------------------------|
//! | `&a + &b`, `&a - &b` | `add`, `subtract` (fallible)      |
//! | `&a * &b`           | `matrix_product` (fallible)       |
//! | `a + s`, `s + a`    | `add_scalar`                      |
//! | `a - s`, `s - a`    | `subtract_scalar`, `scalar_subtract` |
//! | `a * s`, `s * a`    | `scale_by`                        |
//! | `a / s`, `s / a`    | `divide_by_scalar`, `scalar_divide` |
//! | `-a`                | `negate`                          |
//!
//! Matrix-matrix operators return `Result<Matrix>` since shapes may not match.

use crate::error::Result;
use crate::matrix::Matrix;
use std::ops::{Add, Div, Mul, Neg, Sub};

impl Add<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn add(self, rhs: &Matrix) -> Result<Matrix> {
        Matrix::add(self, rhs)
    }
}

impl Sub<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn sub(self, rhs: &Matrix) -> Result<Matrix> {
        self.subtract(rhs)
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Result<Matrix>;

    fn mul(self, rhs: &Matrix) -> Result<Matrix> {
        self.matrix_product(rhs)
    }
}

// Borrowed receivers only: an owned `Add<f64> for Matrix` would shadow the
// inherent `Matrix::add` in method-call syntax.
macro_rules! scalar_ops {
    ($lhs:ty) => {
        impl Add<f64> for $lhs {
            type Output = Matrix;

            fn add(self, s: f64) -> Matrix {
                self.add_scalar(s)
            }
        }

        impl Add<$lhs> for f64 {
            type Output = Matrix;

            fn add(self, m: $lhs) -> Matrix {
                m.add_scalar(self)
            }
        }

        impl Sub<f64> for $lhs {
            type Output = Matrix;

            fn sub(self, s: f64) -> Matrix {
                self.subtract_scalar(s)
            }
        }

        impl Sub<$lhs> for f64 {
            type Output = Matrix;

            fn sub(self, m: $lhs) -> Matrix {
                m.scalar_subtract(self)
            }
        }

        impl Mul<f64> for $lhs {
            type Output = Matrix;

            fn mul(self, s: f64) -> Matrix {
                self.scale_by(s)
            }
        }

        impl Mul<$lhs> for f64 {
            type Output = Matrix;

            fn mul(self, m: $lhs) -> Matrix {
                m.scale_by(self)
            }
        }

        impl Div<f64> for $lhs {
            type Output = Matrix;

            fn div(self, s: f64) -> Matrix {
                self.divide_by_scalar(s)
            }
        }

        impl Div<$lhs> for f64 {
            type Output = Matrix;

            fn div(self, m: $lhs) -> Matrix {
                m.scalar_divide(self)
            }
        }

        impl Neg for $lhs {
            type Output = Matrix;

            fn neg(self) -> Matrix {
                self.negate()
            }
        }
    };
}

scalar_ops!(&Matrix);

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.negate()
    }
}
