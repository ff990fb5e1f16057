//! Agreement metrics between a computed and an experimental series.
//!
//! All functions take two aligned slices of equal length. Degenerate inputs
//! (constant sequences, fewer than two points) produce `NaN` rather than an
//! error so that a single degenerate draw shows up in the aggregated
//! distribution instead of aborting a whole run.

use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The metrics the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Pearson product-moment correlation coefficient.
    PearsonR,
    /// Coefficient of determination, the square of `PearsonR`.
    RSquared,
    /// Kendall rank correlation, tau-b.
    KendallTau,
    /// Mean unsigned error.
    Mue,
    /// Weighted pairwise concordance. Declared but not implemented: the
    /// weighting and normalization are not settled.
    PredictiveIndex,
}

impl MetricKind {
    /// Every metric evaluated on each resample draw, in report order.
    pub const EVALUATED: [MetricKind; 4] = [
        MetricKind::PearsonR,
        MetricKind::RSquared,
        MetricKind::KendallTau,
        MetricKind::Mue,
    ];

    pub fn is_implemented(&self) -> bool {
        !matches!(self, MetricKind::PredictiveIndex)
    }

    /// Short label used in tables and logs.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::PearsonR => "R",
            MetricKind::RSquared => "R2",
            MetricKind::KendallTau => "tau",
            MetricKind::Mue => "MUE",
            MetricKind::PredictiveIndex => "PI",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pearson correlation coefficient of two aligned series.
///
/// Returns `NaN` when either series is constant or has fewer than two points.
pub fn pearson_r(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 || is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    // Rounding can push |r| marginally past one.
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Returns `(r², r)` for two aligned series.
pub fn r_squared(x: &[f64], y: &[f64]) -> (f64, f64) {
    let r = pearson_r(x, y);
    (r * r, r)
}

/// Kendall rank correlation with the tau-b tie correction.
///
/// `NaN` when every pair is tied in either series.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();

    let mut concordant: i64 = 0;
    let mut discordant: i64 = 0;
    let mut ties_x: i64 = 0;
    let mut ties_y: i64 = 0;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = sign(x[i] - x[j]);
            let dy = sign(y[i] - y[j]);
            if dx == 0 {
                ties_x += 1;
            }
            if dy == 0 {
                ties_y += 1;
            }
            match dx * dy {
                1 => concordant += 1,
                -1 => discordant += 1,
                _ => {}
            }
        }
    }

    let n0 = (n * n.saturating_sub(1) / 2) as i64;
    let denominator = (((n0 - ties_x) * (n0 - ties_y)) as f64).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (concordant - discordant) as f64 / denominator
}

/// Mean of the absolute pairwise differences.
pub fn mean_unsigned_error(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let total: f64 = x.iter().zip(y).map(|(a, b)| (a - b).abs()).sum();
    total / x.len() as f64
}

/// Predictive index of Pearlman and Charifson.
///
/// Always fails until the pairwise weighting scheme is specified.
pub fn predictive_index(_x: &[f64], _y: &[f64]) -> Result<f64, AnalyticsError> {
    Err(AnalyticsError::NotImplemented(MetricKind::PredictiveIndex))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

fn sign(v: f64) -> i64 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 5.0, 4.0];
        let expected = 3.5 / 23.75_f64.sqrt();
        assert!((pearson_r(&x, &y) - expected).abs() < EPS);
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let x = [1.0, 2.0, 3.0];
        assert!((pearson_r(&x, &[2.0, 4.0, 6.0]) - 1.0).abs() < EPS);
        assert!((pearson_r(&x, &[3.0, 2.0, 1.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_pearson_constant_is_nan() {
        assert!(pearson_r(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson_r(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(pearson_r(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn test_r_squared_is_square_of_r() {
        let x = [0.3, -1.2, 2.5, 0.9, -0.4];
        let y = [0.1, -0.8, 1.9, 1.5, 0.2];
        let (r2, r) = r_squared(&x, &y);
        assert_eq!(r2, r * r);
    }

    #[test]
    fn test_kendall_without_ties() {
        let tau = kendall_tau(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0]);
        assert!((tau - 1.0 / 3.0).abs() < EPS);
        assert!((kendall_tau(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_kendall_tau_b_ties() {
        // One pair tied in x: (C - D) / sqrt((3 - 1) * (3 - 0))
        let tau = kendall_tau(&[1.0, 2.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!((tau - 2.0 / 6.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_kendall_all_tied_is_nan() {
        assert!(kendall_tau(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(kendall_tau(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_mue() {
        assert_eq!(mean_unsigned_error(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        let mue = mean_unsigned_error(&[1.0, -2.0, 0.5], &[0.0, 1.0, 0.5]);
        assert!((mue - 4.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_predictive_index_not_implemented() {
        assert_eq!(
            predictive_index(&[1.0, 2.0], &[1.0, 2.0]),
            Err(AnalyticsError::NotImplemented(MetricKind::PredictiveIndex))
        );
        assert!(!MetricKind::PredictiveIndex.is_implemented());
        assert!(MetricKind::EVALUATED.iter().all(|m| m.is_implemented()));
    }
}
