//! SVD decomposition algorithms

pub mod jacobi;

pub use jacobi::{FullSvd, jacobi_svd};
