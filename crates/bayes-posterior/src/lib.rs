//! Posterior distributions from a prior and a likelihood
//!
//! This crate is the numerical engine of a Bayesian update. Given two
//! distributions it builds their normalized product and answers queries
//! against it.
//!
//! # Key Features
//!
//! - **Posterior density**: normalization by split integration anchored at
//!   the midpoint of the two means
//! - **Cached CDF**: every evaluation is memoized in an ordered map; new
//!   points integrate only from the nearest cached point below, and the
//!   saturated upper tail is answered without integration
//! - **Quantile batches**: Brent's method on `cdf(x) - q`, extremes solved
//!   first so interior quantiles reuse solved neighbours as brackets
//! - **Chained updates**: a [`Posterior`] is itself a [`Distribution`]
//! - **Presentation data**: plotting domain, PDF samples and a serializable
//!   [`UpdateSummary`]
//!
//! # Example
//!
//! ```rust
//! use bayes_core::{Beta, Normal};
//! use bayes_posterior::{Posterior, DEFAULT_PERCENTILES};
//!
//! let prior = Beta::new(2.0, 5.0).unwrap();
//! let likelihood = Normal::new(0.35, 0.1).unwrap();
//! let posterior = Posterior::new(&prior, &likelihood).unwrap();
//!
//! let report = posterior.solve_many(&DEFAULT_PERCENTILES).unwrap();
//! assert!(report.is_complete());
//!
//! let values: Vec<f64> = report.solved().into_iter().map(|(_, x)| x).collect();
//! assert!(values.windows(2).all(|w| w[0] < w[1]));
//! ```
//!
//! A posterior caches CDF values with interior mutability and is meant for a
//! single computation. Concurrent requests each build their own.

pub mod cdf;
pub mod custom;
pub mod domain;
pub mod error;
pub mod posterior;
pub mod roots;
pub mod solver;
pub mod summary;

pub use bayes_core::{Distribution, EngineConfig, Interval};
pub use cdf::{CdfCache, CdfCacheStats};
pub use custom::CustomPdf;
pub use domain::plot_domain;
pub use error::{Error, Result};
pub use posterior::{Posterior, PosteriorBuilder};
pub use roots::{brentq, Root};
pub use solver::{solve_order, QuantileReport, QuantileRow, DEFAULT_PERCENTILES};
pub use summary::{pdf_samples, UpdateSummary};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CustomPdf, Distribution, EngineConfig, Error, Interval, Posterior, PosteriorBuilder,
        QuantileReport, Result, UpdateSummary,
    };
}
