//! QR decomposition via Householder reflections

pub mod householder;

pub use householder::{HouseholderQr, householder_qr, reflector, reflector_apply};
