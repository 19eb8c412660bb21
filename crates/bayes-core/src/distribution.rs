//! The distribution capability and the parametric families built on statrs
//!
//! The posterior engine never looks inside a distribution: it only needs the
//! five operations of [`Distribution`]. The closed set of parametric families
//! that front ends offer is modelled as the [`Family`] enum, each variant a
//! thin wrapper over the matching `statrs` distribution.

use crate::{Error, Interval, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{self as sd, Continuous, ContinuousCDF};

/// A continuous probability distribution, as seen by the posterior engine
///
/// Implementations must be immutable for the lifetime of a computation.
pub trait Distribution {
    /// Probability density at `x`, zero outside the support
    fn pdf(&self, x: f64) -> f64;

    /// Cumulative probability at `x`
    fn cdf(&self, x: f64) -> f64;

    /// Inverse of the CDF for `p` in (0, 1)
    fn quantile(&self, p: f64) -> f64;

    /// Mean of the distribution
    fn expectation(&self) -> f64;

    /// Interval outside of which the density is zero
    fn support(&self) -> Interval;
}

impl<D: Distribution + ?Sized> Distribution for &D {
    fn pdf(&self, x: f64) -> f64 {
        (**self).pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        (**self).cdf(x)
    }

    fn quantile(&self, p: f64) -> f64 {
        (**self).quantile(p)
    }

    fn expectation(&self) -> f64 {
        (**self).expectation()
    }

    fn support(&self) -> Interval {
        (**self).support()
    }
}

fn stats_error(family: &str, err: statrs::StatsError) -> Error {
    Error::InvalidParameter(format!("Invalid {family} parameters: {err}"))
}

/// Normal distribution with a location and a scale (standard deviation)
#[derive(Debug, Clone, Copy)]
pub struct Normal {
    inner: sd::Normal,
    location: f64,
    scale: f64,
}

impl Normal {
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        if !location.is_finite() || scale <= 0.0 || !scale.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "Normal needs a finite location and positive finite scale, got ({location}, {scale})"
            )));
        }
        let inner = sd::Normal::new(location, scale).map_err(|e| stats_error("normal", e))?;
        Ok(Self {
            inner,
            location,
            scale,
        })
    }

    pub fn location(&self) -> f64 {
        self.location
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Distribution for Normal {
    fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn quantile(&self, p: f64) -> f64 {
        self.inner.inverse_cdf(p)
    }

    fn expectation(&self) -> f64 {
        self.location
    }

    fn support(&self) -> Interval {
        Interval::REAL_LINE
    }
}

/// Log-normal distribution: `exp(X)` where `X ~ Normal(mu, sigma)`
#[derive(Debug, Clone, Copy)]
pub struct LogNormal {
    inner: sd::LogNormal,
    log_scale: sd::Normal,
    mu: f64,
    sigma: f64,
}

impl LogNormal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || sigma <= 0.0 || !sigma.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "LogNormal needs a finite mu and positive finite sigma, got ({mu}, {sigma})"
            )));
        }
        let inner = sd::LogNormal::new(mu, sigma).map_err(|e| stats_error("lognormal", e))?;
        let log_scale = sd::Normal::new(mu, sigma).map_err(|e| stats_error("lognormal", e))?;
        Ok(Self {
            inner,
            log_scale,
            mu,
            sigma,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for LogNormal {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        self.inner.cdf(x)
    }

    fn quantile(&self, p: f64) -> f64 {
        // exp of the underlying normal quantile is exact
        self.log_scale.inverse_cdf(p).exp()
    }

    fn expectation(&self) -> f64 {
        (self.mu + 0.5 * self.sigma * self.sigma).exp()
    }

    fn support(&self) -> Interval {
        Interval::NON_NEGATIVE
    }
}

/// Beta distribution on the unit interval
#[derive(Debug, Clone, Copy)]
pub struct Beta {
    inner: sd::Beta,
    alpha: f64,
    beta: f64,
}

impl Beta {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || beta <= 0.0 || !alpha.is_finite() || !beta.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "Beta needs positive finite shapes, got ({alpha}, {beta})"
            )));
        }
        let inner = sd::Beta::new(alpha, beta).map_err(|e| stats_error("beta", e))?;
        Ok(Self { inner, alpha, beta })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Distribution for Beta {
    fn pdf(&self, x: f64) -> f64 {
        if !Interval::UNIT.contains(x) {
            return 0.0;
        }
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            self.inner.cdf(x)
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        self.inner.inverse_cdf(p)
    }

    fn expectation(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    fn support(&self) -> Interval {
        Interval::UNIT
    }
}

/// The parametric families offered to users
#[derive(Debug, Clone, Copy)]
pub enum Family {
    Normal(Normal),
    LogNormal(LogNormal),
    Beta(Beta),
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Normal(_) => "normal",
            Family::LogNormal(_) => "lognormal",
            Family::Beta(_) => "beta",
        }
    }
}

impl Distribution for Family {
    fn pdf(&self, x: f64) -> f64 {
        match self {
            Family::Normal(d) => d.pdf(x),
            Family::LogNormal(d) => d.pdf(x),
            Family::Beta(d) => d.pdf(x),
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        match self {
            Family::Normal(d) => d.cdf(x),
            Family::LogNormal(d) => d.cdf(x),
            Family::Beta(d) => d.cdf(x),
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        match self {
            Family::Normal(d) => d.quantile(p),
            Family::LogNormal(d) => d.quantile(p),
            Family::Beta(d) => d.quantile(p),
        }
    }

    fn expectation(&self) -> f64 {
        match self {
            Family::Normal(d) => d.expectation(),
            Family::LogNormal(d) => d.expectation(),
            Family::Beta(d) => d.expectation(),
        }
    }

    fn support(&self) -> Interval {
        match self {
            Family::Normal(d) => d.support(),
            Family::LogNormal(d) => d.support(),
            Family::Beta(d) => d.support(),
        }
    }
}

impl From<Normal> for Family {
    fn from(d: Normal) -> Self {
        Family::Normal(d)
    }
}

impl From<LogNormal> for Family {
    fn from(d: LogNormal) -> Self {
        Family::LogNormal(d)
    }
}

impl From<Beta> for Family {
    fn from(d: Beta) -> Self {
        Family::Beta(d)
    }
}

/// Serializable description of a parametric family
///
/// ```
/// use bayes_core::{Distribution, FamilySpec};
///
/// let spec: FamilySpec =
///     serde_json::from_str(r#"{"family": "normal", "location": 1.0, "scale": 2.0}"#).unwrap();
/// let dist = spec.build().unwrap();
/// assert_eq!(dist.expectation(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum FamilySpec {
    Normal { location: f64, scale: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Beta { alpha: f64, beta: f64 },
}

impl FamilySpec {
    /// Validate the parameters and construct the distribution
    pub fn build(&self) -> Result<Family> {
        Ok(match *self {
            FamilySpec::Normal { location, scale } => Normal::new(location, scale)?.into(),
            FamilySpec::LogNormal { mu, sigma } => LogNormal::new(mu, sigma)?.into(),
            FamilySpec::Beta { alpha, beta } => Beta::new(alpha, beta)?.into(),
        })
    }
}
