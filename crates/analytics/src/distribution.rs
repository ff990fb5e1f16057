//! Per-metric resample distributions and their empirical summaries.

use crate::error::AnalyticsError;
use crate::metrics::MetricKind;
use serde::{Deserialize, Serialize};

/// Empirical confidence interval around the median of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
    /// The confidence level the bounds were computed with.
    pub level: f64,
}

impl ConfidenceInterval {
    /// `[median, lower, upper]`
    pub fn as_array(&self) -> [f64; 3] {
        [self.median, self.lower, self.upper]
    }
}

/// The values one metric took across every resample draw of a run, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    kind: MetricKind,
    values: Vec<f64>,
}

impl MetricDistribution {
    pub(crate) fn with_capacity(kind: MetricKind, capacity: usize) -> Self {
        Self {
            kind,
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean. `NaN` if any draw was `NaN`.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation (divides by N).
    pub fn std(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }

    /// Median; the mean of the two middle values when N is even.
    pub fn median(&self) -> f64 {
        median_of_sorted(&self.sorted())
    }

    /// Median plus the empirical bounds at `floor((1 - level) * N)` and
    /// `ceil(level * N)` of the sorted draws.
    ///
    /// For a level inside `[0, 1]` the upper index is capped at the last draw.
    /// Below 0.5 the two indices cross, so the smaller one is reported as
    /// `lower`; the interval always satisfies `lower <= median <= upper`.
    /// Levels outside `[0, 1]` are used as given, and an index that falls
    /// outside the distribution is reported as an error.
    pub fn confidence(&self, level: f64) -> Result<ConfidenceInterval, AnalyticsError> {
        let sorted = self.sorted();
        let n = sorted.len();
        let valid_level = (0.0..=1.0).contains(&level);

        let lower_idx = quantile_index(((1.0 - level) * n as f64).floor(), n, valid_level)?;
        let upper_idx = quantile_index((level * n as f64).ceil(), n, valid_level)?;
        let (lower_idx, upper_idx) = (lower_idx.min(upper_idx), lower_idx.max(upper_idx));

        Ok(ConfidenceInterval {
            median: median_of_sorted(&sorted),
            lower: sorted[lower_idx],
            upper: sorted[upper_idx],
            level,
        })
    }

    fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

fn quantile_index(raw: f64, len: usize, cap_at_last: bool) -> Result<usize, AnalyticsError> {
    if cap_at_last && len > 0 && raw >= len as f64 {
        return Ok(len - 1);
    }
    if !raw.is_finite() || raw < 0.0 || raw >= len as f64 {
        return Err(AnalyticsError::QuantileOutOfRange {
            index: raw as i64,
            len,
        });
    }
    Ok(raw as usize)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 || sorted.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
