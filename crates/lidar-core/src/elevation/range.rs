//! Robust elevation range for colour-gradient normalisation.
//!
//! The raw [min, max] of a LiDAR tile is dominated by a handful of noise
//! returns (birds, multipath, low points below ground). The estimator builds a
//! fixed-resolution histogram over the raw extent and trims the lowest and
//! highest 1% of the cumulative mass:
//!
//!   lower = ⌊n · 0.01⌋,  upper = ⌊n · 0.99⌋
//!   robust_min_index = first bin with cumulative count  > lower
//!   robust_max_index = first bin with cumulative count >= upper
//!
//! The comparison asymmetry is part of the observable output and is kept as-is.
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::RangeConfig;
use crate::point::Point3;

use super::sampling::sample_elevations;

/// A closed elevation interval, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

impl ElevationRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, z: f64) -> bool {
        self.min <= z && z <= self.max
    }
}

/// Raw extremes of the finite values in `values`, or `None` when there are none.
pub fn raw_extent(values: &[f64]) -> Option<ElevationRange> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    if min > max {
        return None;
    }
    Some(ElevationRange::new(min, max))
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// Equal-width histogram of elevations over [min, max].
///
/// Every finite sample lands in exactly one bin; a value equal to `max` is
/// clamped into the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationHistogram {
    pub counts: Vec<u32>,
    pub min: f64,
    pub bin_width: f64,
}

#[inline]
fn bin_index(v: f64, min: f64, bin_width: f64, bins: usize) -> usize {
    let t = ((v - min) / bin_width).floor();
    if t <= 0.0 {
        0
    } else {
        (t as usize).min(bins - 1)
    }
}

impl ElevationHistogram {
    /// Build a `bins`-bucket histogram over `range`. Non-finite values are skipped.
    ///
    /// `bins` must be at least 1 and `range` must have a positive extent.
    pub fn build(values: &[f64], range: ElevationRange, bins: usize) -> Self {
        let bin_width = range.extent() / bins as f64;
        let counts = accumulate(values, range.min, bin_width, bins);
        Self {
            counts,
            min: range.min,
            bin_width,
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Lower edge of bin `index`.
    pub fn bin_start(&self, index: usize) -> f64 {
        self.min + index as f64 * self.bin_width
    }

    /// First bin whose running count is strictly greater than `threshold`.
    pub fn first_bin_above(&self, threshold: u64) -> Option<usize> {
        let mut cumulative = 0u64;
        self.counts.iter().position(|&c| {
            cumulative += c as u64;
            cumulative > threshold
        })
    }

    /// First bin whose running count reaches `threshold`.
    pub fn first_bin_reaching(&self, threshold: u64) -> Option<usize> {
        let mut cumulative = 0u64;
        self.counts.iter().position(|&c| {
            cumulative += c as u64;
            cumulative >= threshold
        })
    }
}

#[cfg(not(feature = "threading"))]
fn accumulate(values: &[f64], min: f64, bin_width: f64, bins: usize) -> Vec<u32> {
    let mut counts = vec![0u32; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        counts[bin_index(v, min, bin_width, bins)] += 1;
    }
    counts
}

#[cfg(feature = "threading")]
fn accumulate(values: &[f64], min: f64, bin_width: f64, bins: usize) -> Vec<u32> {
    use rayon::prelude::*;

    values
        .par_iter()
        .filter(|v| v.is_finite())
        .fold(
            || vec![0u32; bins],
            |mut counts, &v| {
                counts[bin_index(v, min, bin_width, bins)] += 1;
                counts
            },
        )
        .reduce(
            || vec![0u32; bins],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}

// ── Estimator ─────────────────────────────────────────────────────────────────

/// Histogram-trimmed elevation range estimator.
#[derive(Debug, Clone, Default)]
pub struct RobustRangeEstimator {
    config: RangeConfig,
}

impl RobustRangeEstimator {
    pub fn new(config: RangeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RangeConfig {
        &self.config
    }

    /// Trimmed range of `values`.
    ///
    /// Returns `None` when there is no finite value to look at; callers keep
    /// whatever range they had before. A raw extent below the flat threshold
    /// is returned unmodified.
    pub fn estimate(&self, values: &[f64]) -> Option<ElevationRange> {
        let raw = raw_extent(values)?;

        let dropped = values.iter().filter(|v| !v.is_finite()).count();
        if dropped > 0 {
            warn!("ignoring {dropped} non-finite elevation samples");
        }

        if !raw.extent().is_finite() {
            warn!(
                "elevation extent [{}, {}] overflows f64, keeping raw range",
                raw.min, raw.max
            );
            return Some(raw);
        }

        if raw.extent() < self.config.flat_threshold {
            debug!(
                "flat sample set (extent {:.4} m), keeping raw range [{}, {}]",
                raw.extent(),
                raw.min,
                raw.max
            );
            return Some(raw);
        }

        let bins = self.config.bins.max(1);
        let histogram = ElevationHistogram::build(values, raw, bins);
        let total = histogram.total();

        let lower = (total as f64 * self.config.lower_fraction).floor() as u64;
        let upper = (total as f64 * self.config.upper_fraction).floor() as u64;

        let min_index = histogram.first_bin_above(lower).unwrap_or(0);
        let max_index = histogram
            .first_bin_reaching(upper)
            .unwrap_or(bins - 1)
            .max(min_index);
        trace!(
            "robust range: n={total} lower={lower} upper={upper} bins=[{min_index}, {max_index}]"
        );

        Some(ElevationRange::new(
            histogram.bin_start(min_index),
            histogram.bin_start(max_index),
        ))
    }

    /// Sample at most `max_samples` elevations from `points`, then estimate.
    pub fn estimate_points(&self, points: &[Point3]) -> Option<ElevationRange> {
        let samples = sample_elevations(points, self.config.max_samples);
        self.estimate(&samples)
    }
}

/// Trimmed range with the default 256-bin, 1%/99% settings.
pub fn compute_robust_range(values: &[f64]) -> Option<ElevationRange> {
    RobustRangeEstimator::default().estimate(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(compute_robust_range(&[]), None);
        assert_eq!(compute_robust_range(&[f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn overflowing_extent_returns_raw_range() {
        let range = compute_robust_range(&[-1.7e308, 0.0, 1.7e308]).unwrap();
        assert_eq!(range, ElevationRange::new(-1.7e308, 1.7e308));
    }

    #[test]
    fn equal_fractions_never_invert_range() {
        let estimator = RobustRangeEstimator::new(RangeConfig {
            lower_fraction: 0.5,
            upper_fraction: 0.5,
            ..RangeConfig::default()
        });
        let range = estimator.estimate(&linspace(0.0, 100.0, 10_000)).unwrap();
        assert!(range.min <= range.max, "inverted range {range:?}");
        assert_abs_diff_eq!(range.min, 50.0, epsilon = 100.0 / 256.0);
    }

    #[test]
    fn flat_terrain_returns_raw_extremes() {
        let values = [5.0, 5.05, 5.02, 5.0, 5.09];
        let range = compute_robust_range(&values).unwrap();
        assert_eq!(range, ElevationRange::new(5.0, 5.09));
    }

    #[test]
    fn identical_values_collapse_to_point() {
        let values = vec![-12.5; 1000];
        let range = compute_robust_range(&values).unwrap();
        assert_eq!(range, ElevationRange::new(-12.5, -12.5));
    }

    #[test]
    fn uniform_input_trims_one_percent_each_side() {
        let values = linspace(0.0, 100.0, 10_000);
        let range = compute_robust_range(&values).unwrap();
        let bin_width = 100.0 / 256.0;
        assert_abs_diff_eq!(range.min, 1.0, epsilon = bin_width);
        assert_abs_diff_eq!(range.max, 99.0, epsilon = bin_width);
    }

    #[test]
    fn single_outlier_is_excluded_from_max() {
        let mut values = vec![50.0; 9_999];
        values.push(10_000.0);
        let range = compute_robust_range(&values).unwrap();
        assert_eq!(range.min, 50.0);
        assert!(
            range.max < 100.0,
            "outlier should be trimmed, got max = {}",
            range.max
        );
    }

    #[test]
    fn robust_range_nested_in_raw_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for trial in 0..200 {
            let n = rng.gen_range(1..2_000);
            let centre: f64 = rng.gen_range(-500.0..500.0);
            let spread: f64 = rng.gen_range(0.0..50.0);
            let values: Vec<f64> = (0..n)
                .map(|_| centre + rng.gen_range(-1.0..=1.0) * spread)
                .collect();

            let raw = raw_extent(&values).unwrap();
            let robust = compute_robust_range(&values).unwrap();
            assert!(
                raw.min <= robust.min && robust.min <= robust.max && robust.max <= raw.max,
                "trial {trial}: raw {raw:?} robust {robust:?}"
            );
        }
    }

    #[test]
    fn negative_elevations_handled_relative_to_min() {
        let values = linspace(-300.0, -200.0, 10_000);
        let range = compute_robust_range(&values).unwrap();
        let bin_width = 100.0 / 256.0;
        assert_abs_diff_eq!(range.min, -299.0, epsilon = bin_width);
        assert_abs_diff_eq!(range.max, -201.0, epsilon = bin_width);
    }

    #[test]
    fn histogram_mass_equals_sample_count() {
        let values = linspace(10.0, 20.0, 777);
        let hist = ElevationHistogram::build(&values, ElevationRange::new(10.0, 20.0), 256);
        assert_eq!(hist.total(), 777);
        // The exact max value is clamped into the last bin.
        assert!(hist.counts[255] >= 1);
    }

    #[test]
    fn lower_scan_is_strict_upper_scan_is_inclusive() {
        let hist = ElevationHistogram {
            counts: vec![1, 0, 1, 1],
            min: 0.0,
            bin_width: 1.0,
        };
        assert_eq!(hist.first_bin_above(1), Some(2));
        assert_eq!(hist.first_bin_reaching(1), Some(0));
        assert_eq!(hist.first_bin_above(3), None);
    }

    #[test]
    fn estimate_points_uses_sampled_elevations() {
        let points: Vec<Point3> = linspace(0.0, 100.0, 10_000)
            .into_iter()
            .map(|z| Point3::new(0.0, 0.0, z))
            .collect();
        let estimator = RobustRangeEstimator::new(RangeConfig {
            max_samples: 1_000,
            ..RangeConfig::default()
        });
        let range = estimator.estimate_points(&points).unwrap();
        assert_abs_diff_eq!(range.min, 1.0, epsilon = 1.0);
        assert_abs_diff_eq!(range.max, 99.0, epsilon = 1.0);
    }
}
