//! The posterior density: normalized product of a prior and a likelihood

use crate::cdf::{CdfCache, CdfCacheStats};
use crate::{Error, Result};
use bayes_core::{Distribution, EngineConfig, Interval, QuadratureConfig};
use bayes_quadrature::{split_integrate, GaussKronrod, Quadrature};
use tracing::{debug, instrument, warn};

/// Posterior distribution `prior(x) * likelihood(x) / Z`
///
/// The normalization constant `Z` is integrated once at construction. The
/// prior and likelihood are borrowed and must outlive the posterior. CDF
/// values are memoized per posterior, so a posterior belongs to a single
/// computation and is deliberately not `Sync`.
///
/// # Example
///
/// ```rust
/// use bayes_core::Normal;
/// use bayes_posterior::Posterior;
///
/// let prior = Normal::new(0.0, 1.0).unwrap();
/// let likelihood = Normal::new(0.0, 1.0).unwrap();
/// let posterior = Posterior::new(&prior, &likelihood).unwrap();
///
/// assert!((posterior.cdf(0.0).unwrap() - 0.5).abs() < 1e-6);
/// assert!(posterior.expectation().unwrap().abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct Posterior<'a, P: ?Sized, L: ?Sized, Q = GaussKronrod> {
    prior: &'a P,
    likelihood: &'a L,
    quadrature: Q,
    config: EngineConfig,
    support: Interval,
    mode_estimate: f64,
    normalization_constant: f64,
    effective_width: f64,
    cache: CdfCache,
}

impl<'a, P, L> Posterior<'a, P, L, GaussKronrod>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
{
    /// Build a posterior with the default configuration
    pub fn new(prior: &'a P, likelihood: &'a L) -> Result<Self> {
        PosteriorBuilder::new().build(prior, likelihood)
    }

    /// Build a posterior with a custom configuration
    pub fn with_config(prior: &'a P, likelihood: &'a L, config: EngineConfig) -> Result<Self> {
        PosteriorBuilder::new().config(config).build(prior, likelihood)
    }
}

impl<'a, P, L, Q> Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    #[instrument(skip_all, fields(prior = %prior.support(), likelihood = %likelihood.support()))]
    fn construct(
        prior: &'a P,
        likelihood: &'a L,
        quadrature: Q,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let prior_support = prior.support();
        let likelihood_support = likelihood.support();
        let support = prior_support
            .intersect(&likelihood_support)
            .map_err(|_| Error::NoOverlap {
                prior: prior_support,
                likelihood: likelihood_support,
            })?;

        // midpoint of the two means; a split point for integration, not a true mode
        let mode_estimate = 0.5 * (prior.expectation() + likelihood.expectation());
        if !mode_estimate.is_finite() {
            return Err(bayes_core::Error::non_finite("mode estimate").into());
        }

        let unnormalized = |x: f64| prior.pdf(x) * likelihood.pdf(x);
        let normalization_constant =
            split_integrate(&quadrature, unnormalized, mode_estimate, support.upper(), support)?;
        if normalization_constant <= 0.0 || !normalization_constant.is_finite() {
            warn!(normalization_constant, "posterior has no usable mass");
            return Err(Error::DegenerateNormalization {
                constant: normalization_constant,
            });
        }

        // width of a box with the posterior's height at the mode estimate
        let anchor = mode_estimate.clamp(support.lower(), support.upper());
        let effective_width = normalization_constant / unnormalized(anchor);

        debug!(
            %support,
            mode_estimate,
            normalization_constant,
            effective_width,
            "posterior constructed"
        );

        Ok(Self {
            prior,
            likelihood,
            quadrature,
            config,
            support,
            mode_estimate,
            normalization_constant,
            effective_width,
            cache: CdfCache::new(config.cdf),
        })
    }

    /// Product of the two input densities, before normalization
    pub fn unnormalized_pdf(&self, x: f64) -> f64 {
        self.prior.pdf(x) * self.likelihood.pdf(x)
    }

    /// Posterior density at `x`, zero outside the support
    pub fn pdf(&self, x: f64) -> f64 {
        if !self.support.contains(x) {
            return 0.0;
        }
        self.unnormalized_pdf(x) / self.normalization_constant
    }

    /// Posterior mean, integrated afresh on every call
    pub fn expectation(&self) -> Result<f64> {
        let mean = split_integrate(
            &self.quadrature,
            |x| x * self.pdf(x),
            self.mode_estimate,
            self.support.upper(),
            self.support,
        )?;
        Ok(mean)
    }

    /// Intersection of the prior and likelihood supports
    pub fn support(&self) -> Interval {
        self.support
    }

    /// Split point used by every integral from the lower end of the support
    pub fn mode_estimate(&self) -> f64 {
        self.mode_estimate
    }

    pub fn normalization_constant(&self) -> f64 {
        self.normalization_constant
    }

    /// Reciprocal of the posterior density at the mode estimate
    ///
    /// A scale for the region holding the mass. Infinite when the density
    /// vanishes at the mode estimate.
    pub fn effective_width(&self) -> f64 {
        self.effective_width
    }

    pub fn prior(&self) -> &'a P {
        self.prior
    }

    pub fn likelihood(&self) -> &'a L {
        self.likelihood
    }

    pub fn quadrature(&self) -> &Q {
        &self.quadrature
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CdfCacheStats {
        self.cache.stats()
    }

    /// Snapshot of every cached `(x, cdf(x))` pair
    pub fn cached_cdf(&self) -> Vec<(f64, f64)> {
        self.cache.entries()
    }

    pub(crate) fn cdf_cache(&self) -> &CdfCache {
        &self.cache
    }
}

/// A posterior is itself a distribution, so it can be the prior of a further
/// update. The trait methods are infallible; numerical failures become `NaN`.
impl<'a, P, L, Q> Distribution for Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    fn pdf(&self, x: f64) -> f64 {
        Posterior::pdf(self, x)
    }

    fn cdf(&self, x: f64) -> f64 {
        Posterior::cdf(self, x).unwrap_or_else(|e| {
            warn!(x, error = %e, "posterior CDF failed");
            f64::NAN
        })
    }

    fn quantile(&self, p: f64) -> f64 {
        Posterior::quantile(self, p).unwrap_or_else(|e| {
            warn!(p, error = %e, "posterior quantile failed");
            f64::NAN
        })
    }

    fn expectation(&self) -> f64 {
        Posterior::expectation(self).unwrap_or_else(|e| {
            warn!(error = %e, "posterior expectation failed");
            f64::NAN
        })
    }

    fn support(&self) -> Interval {
        self.support
    }
}

/// Builder for configuring and creating posteriors
///
/// The quadrature routine is derived from the configuration unless one is
/// supplied explicitly.
#[derive(Debug)]
pub struct PosteriorBuilder<Q = GaussKronrod> {
    config: EngineConfig,
    quadrature: Option<Q>,
}

impl<Q> Default for PosteriorBuilder<Q>
where
    Q: Quadrature + From<QuadratureConfig>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> PosteriorBuilder<Q>
where
    Q: Quadrature + From<QuadratureConfig>,
{
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            quadrature: None,
        }
    }

    /// Sets every tolerance and heuristic at once
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a specific quadrature instance instead of one built from the config
    pub fn quadrature(mut self, quadrature: Q) -> Self {
        self.quadrature = Some(quadrature);
        self
    }

    /// Builds the posterior, integrating its normalization constant
    pub fn build<'a, P, L>(self, prior: &'a P, likelihood: &'a L) -> Result<Posterior<'a, P, L, Q>>
    where
        P: Distribution + ?Sized,
        L: Distribution + ?Sized,
    {
        let quadrature = self
            .quadrature
            .unwrap_or_else(|| Q::from(self.config.quadrature));
        Posterior::construct(prior, likelihood, quadrature, self.config)
    }
}
