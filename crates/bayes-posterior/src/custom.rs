//! Distributions given only by a density closure

use crate::solver::bracket_and_solve;
use crate::{Error, Result};
use bayes_core::{Distribution, EngineConfig, Interval, QuadratureConfig, SolverConfig};
use bayes_quadrature::{split_integrate, GaussKronrod, Quadrature};
use std::fmt;
use tracing::warn;

/// A distribution defined by an arbitrary density on a support
///
/// The density is assumed to integrate to one over the support. CDF,
/// quantile and mean are all derived numerically, with integrals anchored at
/// a centre point. Without a hint the centre is the midpoint of a bounded
/// support, or the point of the support closest to zero otherwise.
///
/// ```rust
/// use bayes_core::{Distribution, Interval};
/// use bayes_posterior::CustomPdf;
///
/// let triangle = CustomPdf::new(|x: f64| 2.0 * x, Interval::UNIT);
/// assert!((triangle.cdf(0.5) - 0.25).abs() < 1e-10);
/// assert!((triangle.expectation() - 2.0 / 3.0).abs() < 1e-10);
/// ```
pub struct CustomPdf<F, Q = GaussKronrod> {
    pdf: F,
    support: Interval,
    quadrature: Q,
    solver: SolverConfig,
    center: f64,
}

impl<F> CustomPdf<F, GaussKronrod>
where
    F: Fn(f64) -> f64,
{
    pub fn new(pdf: F, support: Interval) -> Self {
        Self::with_config(pdf, support, &EngineConfig::default())
    }
}

impl<F, Q> CustomPdf<F, Q>
where
    F: Fn(f64) -> f64,
    Q: Quadrature,
{
    /// Build with the quadrature and solver settings of `config`
    pub fn with_config(pdf: F, support: Interval, config: &EngineConfig) -> Self
    where
        Q: From<QuadratureConfig>,
    {
        let center = if support.is_bounded() {
            support.lower() + 0.5 * support.width()
        } else {
            0.0_f64.clamp(support.lower(), support.upper())
        };
        Self {
            pdf,
            support,
            quadrature: Q::from(config.quadrature),
            solver: config.solver,
            center,
        }
    }

    /// Anchor integrals at `center`, ideally near the bulk of the mass
    pub fn with_center(mut self, center: f64) -> Self {
        self.center = center.clamp(self.support.lower(), self.support.upper());
        self
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    /// Density at `x`, zero outside the support
    pub fn density(&self, x: f64) -> f64 {
        if self.support.contains(x) {
            (self.pdf)(x)
        } else {
            0.0
        }
    }

    /// Total integral of the density over its support
    pub fn mass(&self) -> Result<f64> {
        self.integral_to(self.support.upper())
    }

    fn integral_to(&self, x: f64) -> Result<f64> {
        Ok(split_integrate(
            &self.quadrature,
            |t| self.density(t),
            self.center,
            x,
            self.support,
        )?)
    }

    pub fn try_cdf(&self, x: f64) -> Result<f64> {
        if x <= self.support.lower() {
            return Ok(0.0);
        }
        if x >= self.support.upper() {
            return Ok(1.0);
        }
        Ok(self.integral_to(x)?.clamp(0.0, 1.0))
    }

    pub fn try_quantile(&self, p: f64) -> Result<f64> {
        Error::check_probability(p)?;
        let root = bracket_and_solve(
            |x| self.try_cdf(x),
            p,
            self.support,
            None,
            None,
            &self.solver,
        )?;
        Ok(root.x)
    }

    pub fn try_expectation(&self) -> Result<f64> {
        Ok(split_integrate(
            &self.quadrature,
            |t| t * self.density(t),
            self.center,
            self.support.upper(),
            self.support,
        )?)
    }
}

impl<F, Q> Distribution for CustomPdf<F, Q>
where
    F: Fn(f64) -> f64,
    Q: Quadrature,
{
    fn pdf(&self, x: f64) -> f64 {
        self.density(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.try_cdf(x).unwrap_or_else(|e| {
            warn!(x, error = %e, "custom CDF failed");
            f64::NAN
        })
    }

    fn quantile(&self, p: f64) -> f64 {
        self.try_quantile(p).unwrap_or_else(|e| {
            warn!(p, error = %e, "custom quantile failed");
            f64::NAN
        })
    }

    fn expectation(&self) -> f64 {
        self.try_expectation().unwrap_or_else(|e| {
            warn!(error = %e, "custom expectation failed");
            f64::NAN
        })
    }

    fn support(&self) -> Interval {
        self.support
    }
}

impl<F, Q> fmt::Debug for CustomPdf<F, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPdf")
            .field("support", &self.support)
            .field("center", &self.center)
            .finish_non_exhaustive()
    }
}
