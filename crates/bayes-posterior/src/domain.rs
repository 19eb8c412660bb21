//! Plotting-range heuristic
//!
//! The domain only selects what a presentation layer displays. It never
//! feeds back into any numeric result.

use crate::posterior::Posterior;
use crate::{Error, Result};
use bayes_core::{Distribution, DomainConfig, Interval};
use bayes_quadrature::Quadrature;
use tracing::debug;

/// `[quantile(p), quantile(1 - p)]` of one input
fn central_range<D: Distribution + ?Sized>(dist: &D, tail: f64) -> Result<Interval> {
    Ok(Interval::new(dist.quantile(tail), dist.quantile(1.0 - tail))?)
}

/// Display range for a prior, a likelihood and their posterior
///
/// The central `[p, 1 - p]` ranges of both inputs are merged into their
/// common extent, cut down to the posterior support, then padded on each
/// side by a fraction of the resulting width.
pub fn plot_domain<P, L>(prior: &P, likelihood: &L, config: &DomainConfig) -> Result<Interval>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
{
    let no_overlap = || Error::NoOverlap {
        prior: prior.support(),
        likelihood: likelihood.support(),
    };

    let tail = config.tail_probability;
    let extent = central_range(prior, tail)?.extremities(&central_range(likelihood, tail)?);
    let support = prior
        .support()
        .intersect(&likelihood.support())
        .map_err(|_| no_overlap())?;
    let domain = extent
        .intersect(&support)
        .map_err(|_| no_overlap())?
        .padded(config.padding_fraction);

    debug!(%extent, %support, %domain, "plot domain");
    Ok(domain)
}

impl<'a, P, L, Q> Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    /// Display range for this update, using the configured heuristics
    pub fn plot_domain(&self) -> Result<Interval> {
        plot_domain(self.prior(), self.likelihood(), &self.config().domain)
    }
}
