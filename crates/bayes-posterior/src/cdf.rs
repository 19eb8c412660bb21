//! Memoized CDF evaluation
//!
//! Every evaluated point is stored in an ordered map, so a new query only
//! needs the integral from the nearest cached point below it instead of from
//! the lower end of the support. Steps longer than a few effective widths of
//! the posterior are not extended: a long finite panel can miss the mass
//! entirely. Those queries, and queries with nothing cached below, integrate
//! the near tail from an infinite or support bound to `x`, so the transformed
//! nodes cluster at `x` and the mass lies next to them.
//!
//! Two invariants are maintained:
//!
//! - cached values are non-decreasing in their keys, and lie in `[0, 1]`
//! - once a cached value rounds to 1.0 at the configured precision, every
//!   larger point evaluates to exactly 1.0 without integration, and cached
//!   points above it hold 1.0

use crate::posterior::Posterior;
use crate::Result;
use bayes_core::{CdfConfig, Distribution};
use bayes_quadrature::Quadrature;
use ordered_float::OrderedFloat;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use tracing::{trace, warn};

/// Counters describing how CDF queries were answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CdfCacheStats {
    /// Exact hits on a cached point
    pub hits: usize,
    /// Queries answered from a cached point below plus a short integral
    pub extensions: usize,
    /// Queries with no cached point close enough below them
    pub cold: usize,
    /// Queries answered by the saturated tail
    pub saturated: usize,
    /// Number of cached points
    pub entries: usize,
}

/// Ordered cache of CDF values for one posterior
///
/// Uses interior mutability, so a posterior can evaluate its CDF through a
/// shared reference. The cache is neither `Sync` nor meant to be shared
/// between computations.
#[derive(Debug)]
pub struct CdfCache {
    config: CdfConfig,
    values: RefCell<BTreeMap<OrderedFloat<f64>, f64>>,
    saturated_at: Cell<Option<f64>>,
    stats: Cell<CdfCacheStats>,
}

impl CdfCache {
    pub fn new(config: CdfConfig) -> Self {
        Self {
            config,
            values: RefCell::new(BTreeMap::new()),
            saturated_at: Cell::new(None),
            stats: Cell::new(CdfCacheStats::default()),
        }
    }

    /// Cached value at exactly `x`
    pub fn get(&self, x: f64) -> Option<f64> {
        self.values.borrow().get(&OrderedFloat(x)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Smallest cached point whose value rounds to 1.0
    pub fn saturation_point(&self) -> Option<f64> {
        self.saturated_at.get()
    }

    /// Snapshot of all cached `(x, cdf(x))` pairs in ascending order
    pub fn entries(&self) -> Vec<(f64, f64)> {
        self.values
            .borrow()
            .iter()
            .map(|(k, &v)| (k.into_inner(), v))
            .collect()
    }

    pub fn stats(&self) -> CdfCacheStats {
        CdfCacheStats {
            entries: self.len(),
            ..self.stats.get()
        }
    }

    fn record(&self, update: impl FnOnce(&mut CdfCacheStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn rounds_to_one(&self, value: f64) -> bool {
        let scale = 10f64.powi(self.config.saturation_decimals);
        (value * scale).round() == scale
    }

    /// Whether some cached point strictly below `x` is saturated
    fn saturates_before(&self, x: f64) -> bool {
        self.saturated_at.get().is_some_and(|s| s < x)
    }

    /// Greatest cached point strictly below `x`
    fn predecessor(&self, x: f64) -> Option<(f64, f64)> {
        self.values
            .borrow()
            .range(..OrderedFloat(x))
            .next_back()
            .map(|(k, &v)| (k.into_inner(), v))
    }

    /// Smallest cached point strictly above `x`
    fn successor(&self, x: f64) -> Option<(f64, f64)> {
        self.values
            .borrow()
            .range((Excluded(OrderedFloat(x)), Unbounded))
            .next()
            .map(|(k, &v)| (k.into_inner(), v))
    }

    /// Store a freshly integrated value, repairing monotonicity
    ///
    /// Returns the value actually stored. A new saturation point raises every
    /// cached value above it to 1.0.
    fn insert(&self, x: f64, value: f64) -> f64 {
        let floor = self.predecessor(x).map_or(0.0, |(_, v)| v);
        let ceiling = self.successor(x).map_or(1.0, |(_, v)| v);
        let repaired = value.max(floor).min(ceiling);

        if (repaired - value).abs() > self.config.monotonicity_tolerance {
            warn!(
                x,
                value,
                repaired,
                floor,
                ceiling,
                "CDF integration noise broke monotonicity beyond tolerance"
            );
        }

        let mut values = self.values.borrow_mut();
        values.insert(OrderedFloat(x), repaired);
        if self.rounds_to_one(repaired) && !self.saturates_before(x) {
            self.saturated_at.set(Some(x));
            for (_, v) in values.range_mut((Excluded(OrderedFloat(x)), Unbounded)) {
                *v = 1.0;
            }
        }
        repaired
    }
}

impl<'a, P, L, Q> Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    /// Posterior CDF at `x`
    ///
    /// Answered, in order of preference, from: the support bounds, the
    /// saturated tail, an exact cache hit, the nearest cached point below `x`
    /// plus the integral up to `x`, or a fresh tail integral anchored at `x`.
    pub fn cdf(&self, x: f64) -> Result<f64> {
        if x.is_nan() {
            return Err(bayes_core::Error::InvalidInput("CDF argument is NaN".to_string()).into());
        }
        let support = self.support();
        if x <= support.lower() {
            return Ok(0.0);
        }
        if x >= support.upper() {
            return Ok(1.0);
        }

        let cache = self.cdf_cache();
        if cache.saturates_before(x) {
            cache.record(|s| s.saturated += 1);
            return Ok(1.0);
        }
        if let Some(value) = cache.get(x) {
            cache.record(|s| s.hits += 1);
            return Ok(value);
        }

        let max_step = self.max_extension_step();
        let value = match cache.predecessor(x).filter(|&(key, _)| x - key <= max_step) {
            Some((key, base)) => {
                cache.record(|s| s.extensions += 1);
                let pdf = |t: f64| self.pdf(t);
                let mode = self.mode_estimate();
                // keep the peak on a panel boundary when the step crosses it
                let step = if key < mode && mode < x {
                    self.quadrature().integrate(pdf, key, mode)?.value
                        + self.quadrature().integrate(pdf, mode, x)?.value
                } else {
                    self.quadrature().integrate(pdf, key, x)?.value
                };
                trace!(x, key, base, step, "extending cached CDF");
                base + step
            }
            None => {
                cache.record(|s| s.cold += 1);
                let value = self.anchored_cdf(x)?;
                trace!(x, value, "cold CDF integral");
                value
            }
        };

        Ok(cache.insert(x, value))
    }

    fn max_extension_step(&self) -> f64 {
        let width = self.effective_width();
        if width.is_finite() {
            self.config().cdf.max_extension_widths * width
        } else {
            0.0
        }
    }

    /// CDF from one integral over the tail on the near side of the mode estimate
    ///
    /// Left of the mode estimate this is the integral from the lower end of
    /// the support; from the mode estimate on it is one minus the integral up
    /// to the upper end.
    fn anchored_cdf(&self, x: f64) -> Result<f64> {
        let support = self.support();
        let pdf = |t: f64| self.pdf(t);
        if x < self.mode_estimate() {
            Ok(self.quadrature().integrate(pdf, support.lower(), x)?.value)
        } else {
            let tail = self.quadrature().integrate(pdf, x, support.upper())?.value;
            Ok(1.0 - tail)
        }
    }
}
