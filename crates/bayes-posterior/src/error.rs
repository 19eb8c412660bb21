//! Error types for posterior construction and queries

use bayes_core::Interval;
use thiserror::Error;

/// Errors that can occur while building or querying a posterior
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Prior and likelihood supports do not intersect
    #[error("Prior support {prior} and likelihood support {likelihood} do not overlap")]
    NoOverlap { prior: Interval, likelihood: Interval },

    /// The product density has no usable mass
    #[error("Normalization constant {constant} is not a positive finite number")]
    DegenerateNormalization { constant: f64 },

    /// Brent's method ran out of iterations for one quantile
    #[error("Quantile {quantile} did not converge within {iterations} iterations")]
    QuantileNotConverged { quantile: f64, iterations: usize },

    /// No sign change of `cdf(x) - q` could be established for one quantile
    #[error("Quantile {quantile} could not be bracketed within [{lower}, {upper}]")]
    QuantileNotBracketed { quantile: f64, lower: f64, upper: f64 },

    /// Requested quantile outside (0, 1)
    #[error("Quantile probability {p} must be in (0, 1)")]
    InvalidProbability { p: f64 },

    /// Root finder was handed an interval without a sign change
    #[error("Root not bracketed: f({lower}) = {f_lower}, f({upper}) = {f_upper}")]
    RootNotBracketed {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    /// Root finder exhausted its iteration budget
    #[error("Root finding did not converge after {iterations} iterations (last estimate {estimate})")]
    RootNotConverged { iterations: usize, estimate: f64 },

    /// Core computation error
    #[error("Core computation error: {0}")]
    Core(#[from] bayes_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that a requested quantile lies strictly inside (0, 1)
    pub fn check_probability(p: f64) -> Result<()> {
        if p <= 0.0 || p >= 1.0 || p.is_nan() {
            return Err(Error::InvalidProbability { p });
        }
        Ok(())
    }

    /// Whether this error is confined to a single quantile of a batch
    pub fn is_per_quantile(&self) -> bool {
        matches!(
            self,
            Error::QuantileNotConverged { .. } | Error::QuantileNotBracketed { .. }
        )
    }
}
