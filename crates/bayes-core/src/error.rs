//! Error types for numerical Bayesian updates
//!
//! Provides the shared error type used by every bayes-update crate.

use thiserror::Error;

/// Core error type for interval, distribution and configuration handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two intervals share no common point
    #[error("Empty intersection: lower bound {lower} exceeds upper bound {upper}")]
    EmptyIntersection { lower: f64, upper: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a probability outside (0, 1)
    pub fn invalid_probability(p: f64) -> Self {
        Self::InvalidParameter(format!("Probability {p} must be in (0, 1)"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }
}
