//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: JSON logistic-regression artifact with SHA-256 manifest check
//! - `sanitize`: redaction of sensitive values in log output

pub mod model;
pub mod sanitize;
