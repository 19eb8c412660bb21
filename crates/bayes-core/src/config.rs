//! Numerical tolerances and heuristics for the posterior engine
//!
//! Quadrature defaults follow QUADPACK (`1.49e-8` absolute and relative, 50
//! subdivisions) and solver defaults follow the usual Brent settings.
//! Configurations can be loaded from JSON, with missing fields falling back
//! to their defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Adaptive quadrature settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureConfig {
    /// Absolute error target
    pub abs_tolerance: f64,
    /// Relative error target
    pub rel_tolerance: f64,
    /// Maximum number of interval bisections per integral
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tolerance: 1.49e-8,
            rel_tolerance: 1.49e-8,
            max_subdivisions: 50,
        }
    }
}

/// Bracketed root finding settings used by the quantile solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Absolute tolerance on the root location
    pub xtol: f64,
    /// Relative tolerance on the root location
    pub rtol: f64,
    /// Iteration cap for Brent's method
    pub max_iterations: usize,
    /// Multiplicative step used when growing a bracket over an unbounded support
    pub expansion_factor: f64,
    /// Cap on bracket growth steps before giving up on a quantile
    pub max_expansions: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            xtol: 1e-14,
            rtol: 4.0 * f64::EPSILON,
            max_iterations: 100,
            expansion_factor: 10.0,
            max_expansions: 64,
        }
    }
}

/// CDF cache behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdfConfig {
    /// A cached value that rounds to 1.0 at this many decimals saturates the CDF
    pub saturation_decimals: i32,
    /// Monotonicity repairs larger than this are reported as numerical failures
    pub monotonicity_tolerance: f64,
    /// Longest step, in effective posterior widths, that may be integrated
    /// from a cached point; longer steps are integrated afresh
    pub max_extension_widths: f64,
}

impl Default for CdfConfig {
    fn default() -> Self {
        Self {
            saturation_decimals: 5,
            monotonicity_tolerance: 1e-8,
            max_extension_widths: 4.0,
        }
    }
}

/// Plotting range heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Each input contributes its `[p, 1 - p]` quantile range
    pub tail_probability: f64,
    /// Fraction of the domain width added on each side
    pub padding_fraction: f64,
    /// Number of PDF samples per plotted curve
    pub plot_points: usize,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            tail_probability: 0.1,
            padding_fraction: 0.1,
            plot_points: 100,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub quadrature: QuadratureConfig,
    pub solver: SolverConfig,
    pub cdf: CdfConfig,
    pub domain: DomainConfig,
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidParameter(format!("Malformed engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        let q = &self.quadrature;
        let negative = |v: f64| v < 0.0 || v.is_nan();
        if negative(q.abs_tolerance)
            || negative(q.rel_tolerance)
            || (q.abs_tolerance == 0.0 && q.rel_tolerance == 0.0)
        {
            return Err(Error::InvalidParameter(format!(
                "Quadrature tolerances must be non-negative and not both zero, got abs={} rel={}",
                q.abs_tolerance, q.rel_tolerance
            )));
        }
        if q.max_subdivisions == 0 {
            return Err(Error::InvalidParameter(
                "Quadrature needs at least one subdivision".to_string(),
            ));
        }

        let s = &self.solver;
        if s.xtol <= 0.0 || s.xtol.is_nan() || negative(s.rtol) {
            return Err(Error::InvalidParameter(format!(
                "Solver tolerances must be positive, got xtol={} rtol={}",
                s.xtol, s.rtol
            )));
        }
        if s.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "Solver needs at least one iteration".to_string(),
            ));
        }
        if s.expansion_factor <= 1.0 || !s.expansion_factor.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "Bracket expansion factor must be finite and greater than 1, got {}",
                s.expansion_factor
            )));
        }

        let c = &self.cdf;
        if !(0..=15).contains(&c.saturation_decimals) {
            return Err(Error::InvalidParameter(format!(
                "Saturation decimals must be in [0, 15], got {}",
                c.saturation_decimals
            )));
        }
        if negative(c.monotonicity_tolerance) {
            return Err(Error::InvalidParameter(format!(
                "Monotonicity tolerance must be non-negative, got {}",
                c.monotonicity_tolerance
            )));
        }
        if c.max_extension_widths <= 0.0 || c.max_extension_widths.is_nan() {
            return Err(Error::InvalidParameter(format!(
                "Extension step limit must be positive, got {}",
                c.max_extension_widths
            )));
        }

        let d = &self.domain;
        if d.tail_probability <= 0.0 || d.tail_probability >= 0.5 || d.tail_probability.is_nan() {
            return Err(Error::InvalidParameter(format!(
                "Tail probability must be in (0, 0.5), got {}",
                d.tail_probability
            )));
        }
        if negative(d.padding_fraction) {
            return Err(Error::InvalidParameter(format!(
                "Padding fraction must be non-negative, got {}",
                d.padding_fraction
            )));
        }
        Ok(())
    }
}
