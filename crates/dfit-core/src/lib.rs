//! # dfit-core
//!
//! Core types, traits, and error handling for dfit.
//!
//! This crate provides:
//! - The error taxonomy shared by every estimator
//! - The sample read contract ([`SampleView`])
//! - The estimation result tagged union ([`Distribution`], [`Family`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use traits::{SampleView, finite_values, sample_values};
pub use types::{Distribution, Family};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
