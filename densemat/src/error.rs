//! Error types for matrix operations

use densemat_kernels::KernelError;
use thiserror::Error;

/// Errors reported by matrix construction, indexing, algebra and decompositions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Dimension mismatch in {operation}: {left:?} vs {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Index {index} out of bounds for {axis} of extent {extent}")]
    IndexOutOfBounds {
        axis: Axis,
        index: usize,
        extent: usize,
    },

    #[error("Matrix must be square, got {rows}x{columns}")]
    NotSquare { rows: usize, columns: usize },

    #[error("Matrix is singular")]
    Singular,

    #[error("Cannot reshape {from:?} into {to:?}: element counts differ")]
    InvalidReshape {
        from: (usize, usize),
        to: (usize, usize),
    },

    #[error("Row {row} has {found} elements, expected {expected}")]
    InvalidLiteral {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("QR requires rows >= columns, got {rows}x{columns}")]
    TooFewRows { rows: usize, columns: usize },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Errors reported by a numeric backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Exact zero pivot at index {index}")]
    ZeroPivot { index: usize },

    #[error("No convergence after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Operation {0} is not supported by this backend")]
    Unsupported(&'static str),

    #[error("Backend failure: {0}")]
    Failed(String),
}

impl From<KernelError> for BackendError {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::ZeroPivot { index } => BackendError::ZeroPivot { index },
            KernelError::NoConvergence { iterations } => BackendError::NoConvergence { iterations },
            other => BackendError::Failed(other.to_string()),
        }
    }
}

/// Matrix axis named in indexing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "rows"),
            Axis::Column => write!(f, "columns"),
        }
    }
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;
