//! Elementwise and scalar-broadcast arithmetic

use crate::backend::{ElementwiseOp, with_backend};
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

impl Matrix {
    fn zip_with(&self, other: &Matrix, op: ElementwiseOp, operation: &'static str) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(MatrixError::DimensionMismatch { operation, left: self.shape(), right: other.shape() });
        }
        let mut elements = vec![0.0; self.elements.len()];
        with_backend(|backend| backend.elementwise(op, &self.elements, &other.elements, &mut elements));
        Ok(Matrix { rows: self.rows, columns: self.columns, elements })
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, ElementwiseOp::Add, "add")
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, ElementwiseOp::Subtract, "subtract")
    }

    /// Hadamard product
    pub fn elementwise_multiply(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, ElementwiseOp::Multiply, "elementwise_multiply")
    }

    pub fn elementwise_divide(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, ElementwiseOp::Divide, "elementwise_divide")
    }

    /// Per-element `powf` with exponents taken from `exponents`
    pub fn elementwise_power_matrix(&self, exponents: &Matrix) -> Result<Matrix> {
        self.zip_with(exponents, ElementwiseOp::Power, "elementwise_power")
    }

    pub fn elementwise_power(&self, exponent: f64) -> Matrix {
        self.map(|x| x.powf(exponent))
    }

    pub fn add_scalar(&self, s: f64) -> Matrix {
        self.map(|x| x + s)
    }

    pub fn subtract_scalar(&self, s: f64) -> Matrix {
        self.map(|x| x - s)
    }

    /// `s - x` for every element `x`
    pub fn scalar_subtract(&self, s: f64) -> Matrix {
        self.map(|x| s - x)
    }

    pub fn scale_by(&self, s: f64) -> Matrix {
        self.map(|x| x * s)
    }

    pub fn divide_by_scalar(&self, s: f64) -> Matrix {
        self.map(|x| x / s)
    }

    /// `s / x` for every element `x`
    pub fn scalar_divide(&self, s: f64) -> Matrix {
        self.map(|x| s / x)
    }

    pub fn negate(&self) -> Matrix {
        self.map(|x| -x)
    }
}
