//! Numerical Bayesian updates of continuous distributions
//!
//! Multiply a prior density by a likelihood, renormalize, and query the
//! resulting posterior: its mean, plot samples, and exact percentiles found
//! by inverting a cached CDF.
//!
//! # Crates
//!
//! - [`bayes_core`]: intervals, the [`Distribution`] trait, parametric
//!   families and configuration
//! - [`bayes_quadrature`]: adaptive Gauss-Kronrod and split integration
//! - [`bayes_posterior`]: the posterior, its CDF cache and quantile solver
//!
//! # Example
//!
//! ```rust
//! use bayes_update::prelude::*;
//!
//! let prior = Normal::new(0.0, 1.0).unwrap();
//! let likelihood = Normal::new(2.0, 1.0).unwrap();
//!
//! let report = bayes_update::percentiles(&prior, &likelihood, None).unwrap();
//! let median = report.value(0.5).unwrap();
//! assert!((median - 1.0).abs() < 1e-8);
//!
//! let summary = bayes_update::summarize(&prior, &likelihood, None).unwrap();
//! assert!((summary.expectation - 1.0).abs() < 1e-8);
//! ```

pub use bayes_core;
pub use bayes_posterior;
pub use bayes_quadrature;

pub use bayes_core::{
    Beta, Distribution, EngineConfig, Family, FamilySpec, Interval, LogNormal, Normal,
};
pub use bayes_posterior::{
    CustomPdf, Error, Posterior, PosteriorBuilder, QuantileReport, Result, UpdateSummary,
    DEFAULT_PERCENTILES,
};
pub use bayes_quadrature::{GaussKronrod, Quadrature};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Beta, CustomPdf, Distribution, EngineConfig, Error, Family, FamilySpec, Interval,
        LogNormal, Normal, Posterior, QuantileReport, Result, UpdateSummary,
    };
}

/// Posterior percentiles of one update
///
/// Solves [`DEFAULT_PERCENTILES`] when `quantiles` is `None` or empty.
pub fn percentiles<P, L>(
    prior: &P,
    likelihood: &L,
    quantiles: Option<&[f64]>,
) -> Result<QuantileReport>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
{
    let quantiles: &[f64] = match quantiles {
        Some(q) if !q.is_empty() => q,
        _ => &DEFAULT_PERCENTILES,
    };
    Posterior::new(prior, likelihood)?.solve_many(quantiles)
}

/// Plot samples and mean of one update
pub fn summarize<P, L>(
    prior: &P,
    likelihood: &L,
    override_domain: Option<Interval>,
) -> Result<UpdateSummary>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
{
    Posterior::new(prior, likelihood)?.summarize(override_domain)
}
