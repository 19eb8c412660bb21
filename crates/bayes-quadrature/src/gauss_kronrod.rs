//! Globally adaptive Gauss-Kronrod quadrature
//!
//! Each panel is integrated with the 15-point Kronrod extension of the 7-point
//! Gauss rule; the difference of the two gives the error estimate. The panel
//! with the largest error is bisected until the total error meets the
//! configured tolerance or the subdivision limit is reached.
//!
//! Infinite ranges are mapped onto `(0, 1]` with `x = a + (1 - t) / t` (and
//! its mirror images), so the same finite-panel machinery applies.

use crate::traits::{Quadrature, QuadratureEstimate};
use bayes_core::{Error, QuadratureConfig, Result};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::warn;

/// Kronrod abscissae on [-1, 1], descending; odd indices are the Gauss nodes
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights matching `XGK`
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]` and the centre
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

const POINTS_PER_PANEL: usize = 15;

/// One integrated panel
#[derive(Debug, Clone, Copy)]
struct Panel {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Panel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Panel {}

impl PartialOrd for Panel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Panel {
    // max-heap on error: the worst panel is refined first
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.error).cmp(&OrderedFloat(other.error))
    }
}

/// Apply the G7/K15 pair to `[lower, upper]`
fn kronrod15<F: Fn(f64) -> f64>(f: &F, lower: f64, upper: f64) -> Result<Panel> {
    let centre = 0.5 * (lower + upper);
    let half_length = 0.5 * (upper - lower);
    let abs_half_length = half_length.abs();

    let fc = f(centre);
    let mut result_gauss = fc * WG[3];
    let mut result_kronrod = fc * WGK[7];
    let mut result_abs = result_kronrod.abs();

    let mut left_values = [0.0; 7];
    let mut right_values = [0.0; 7];

    for (j, &node) in XGK.iter().take(7).enumerate() {
        let abscissa = half_length * node;
        let f1 = f(centre - abscissa);
        let f2 = f(centre + abscissa);
        left_values[j] = f1;
        right_values[j] = f2;
        let sum = f1 + f2;
        result_kronrod += WGK[j] * sum;
        result_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            result_gauss += WG[j / 2] * sum;
        }
    }

    let mean = 0.5 * result_kronrod;
    let mut result_asc = WGK[7] * (fc - mean).abs();
    for j in 0..7 {
        result_asc += WGK[j] * ((left_values[j] - mean).abs() + (right_values[j] - mean).abs());
    }

    let value = result_kronrod * half_length;
    if !value.is_finite() {
        return Err(Error::non_finite("integrand"));
    }
    result_abs *= abs_half_length;
    result_asc *= abs_half_length;

    let mut error = ((result_kronrod - result_gauss) * half_length).abs();
    if result_asc != 0.0 && error != 0.0 {
        error = result_asc * (200.0 * error / result_asc).powf(1.5).min(1.0);
    }
    if result_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * result_abs);
    }

    Ok(Panel {
        lower,
        upper,
        value,
        error,
    })
}

/// Adaptive Gauss-Kronrod integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussKronrod {
    config: QuadratureConfig,
}

impl GaussKronrod {
    pub fn new(config: QuadratureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    fn tolerance(&self, value: f64) -> f64 {
        self.config
            .abs_tolerance
            .max(self.config.rel_tolerance * value.abs())
    }

    /// Adaptive bisection over a finite range
    fn adaptive<F: Fn(f64) -> f64>(&self, f: &F, lower: f64, upper: f64) -> Result<QuadratureEstimate> {
        let first = kronrod15(f, lower, upper)?;
        let mut total_value = first.value;
        let mut total_error = first.error;
        let mut evaluations = POINTS_PER_PANEL;
        let mut subdivisions = 0;

        let mut panels = BinaryHeap::new();
        panels.push(first);

        while total_error > self.tolerance(total_value)
            && subdivisions < self.config.max_subdivisions
        {
            let Some(worst) = panels.pop() else { break };
            let mid = 0.5 * (worst.lower + worst.upper);
            if mid <= worst.lower || mid >= worst.upper {
                // panel is at floating point resolution
                panels.push(worst);
                break;
            }

            let left = kronrod15(f, worst.lower, mid)?;
            let right = kronrod15(f, mid, worst.upper)?;
            total_value += left.value + right.value - worst.value;
            total_error += left.error + right.error - worst.error;
            evaluations += 2 * POINTS_PER_PANEL;
            subdivisions += 1;

            panels.push(left);
            panels.push(right);
        }

        // resum to shed the drift of the running totals
        let value: f64 = panels.iter().map(|p| p.value).sum();
        let abs_error: f64 = panels.iter().map(|p| p.error).sum();
        let converged = abs_error <= self.tolerance(value);
        if !converged {
            warn!(
                lower,
                upper,
                value,
                abs_error,
                subdivisions,
                "quadrature did not reach the requested tolerance"
            );
        }

        Ok(QuadratureEstimate {
            value,
            abs_error,
            evaluations,
            subdivisions,
            converged,
        })
    }
}

impl From<QuadratureConfig> for GaussKronrod {
    fn from(config: QuadratureConfig) -> Self {
        Self::new(config)
    }
}

impl Quadrature for GaussKronrod {
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<QuadratureEstimate>
    where
        F: Fn(f64) -> f64,
    {
        if lower.is_nan() || upper.is_nan() {
            return Err(Error::InvalidInput(format!(
                "Integration bounds must not be NaN, got ({lower}, {upper})"
            )));
        }
        if lower == upper {
            return Ok(QuadratureEstimate::zero());
        }
        if lower > upper {
            return self.integrate(f, upper, lower).map(QuadratureEstimate::negated);
        }

        match (lower.is_finite(), upper.is_finite()) {
            (true, true) => self.adaptive(&f, lower, upper),
            (true, false) => {
                let mapped = |t: f64| f(lower + (1.0 - t) / t) / (t * t);
                self.adaptive(&mapped, 0.0, 1.0)
            }
            (false, true) => {
                let mapped = |t: f64| f(upper - (1.0 - t) / t) / (t * t);
                self.adaptive(&mapped, 0.0, 1.0)
            }
            (false, false) => {
                let mapped = |t: f64| {
                    let x = (1.0 - t) / t;
                    (f(x) + f(-x)) / (t * t)
                };
                self.adaptive(&mapped, 0.0, 1.0)
            }
        }
    }
}
