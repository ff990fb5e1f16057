use crate::distribution::{ConfidenceInterval, MetricDistribution};
use crate::error::AnalyticsError;
use crate::metrics::MetricKind;
use serde::{Deserialize, Serialize};

/// The values extracted from both series for the compared compounds,
/// index-aligned with `StatisticsReport::compounds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairedValues {
    pub computed: Vec<f64>,
    pub computed_uncertainty: Vec<f64>,
    pub experimental: Vec<f64>,
}

impl PairedValues {
    pub fn len(&self) -> usize {
        self.computed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.computed.is_empty()
    }
}

/// Mean, spread and confidence interval of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: MetricKind,
    pub mean: f64,
    pub std: f64,
    pub confidence: ConfidenceInterval,
}

/// The outcome of one `generate_statistics` run.
///
/// Holds the compared compounds, the paired input values and one distribution
/// per evaluated metric. A report never changes after it is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub(crate) compounds: Vec<String>,
    pub(crate) paired: PairedValues,
    pub(crate) confidence_level: f64,
    pub(crate) r: MetricDistribution,
    pub(crate) r2: MetricDistribution,
    pub(crate) tau: MetricDistribution,
    pub(crate) mue: MetricDistribution,
}

impl StatisticsReport {
    /// The compounds compared, in evaluation order.
    pub fn compounds(&self) -> &[String] {
        &self.compounds
    }

    pub fn paired_values(&self) -> &PairedValues {
        &self.paired
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Number of resample draws behind every distribution.
    pub fn repeats(&self) -> usize {
        self.r.len()
    }

    pub fn distribution(&self, kind: MetricKind) -> Result<&MetricDistribution, AnalyticsError> {
        match kind {
            MetricKind::PearsonR => Ok(&self.r),
            MetricKind::RSquared => Ok(&self.r2),
            MetricKind::KendallTau => Ok(&self.tau),
            MetricKind::Mue => Ok(&self.mue),
            MetricKind::PredictiveIndex => Err(AnalyticsError::NotImplemented(kind)),
        }
    }

    pub fn mean(&self, kind: MetricKind) -> Result<f64, AnalyticsError> {
        Ok(self.distribution(kind)?.mean())
    }

    pub fn std(&self, kind: MetricKind) -> Result<f64, AnalyticsError> {
        Ok(self.distribution(kind)?.std())
    }

    /// Median and bounds at the report's confidence level.
    pub fn confidence(&self, kind: MetricKind) -> Result<ConfidenceInterval, AnalyticsError> {
        self.distribution(kind)?.confidence(self.confidence_level)
    }

    pub fn summary(&self, kind: MetricKind) -> Result<MetricSummary, AnalyticsError> {
        let distribution = self.distribution(kind)?;
        Ok(MetricSummary {
            metric: kind,
            mean: distribution.mean(),
            std: distribution.std(),
            confidence: distribution.confidence(self.confidence_level)?,
        })
    }

    /// Summaries of every evaluated metric, in `MetricKind::EVALUATED` order.
    pub fn summaries(&self) -> Result<Vec<MetricSummary>, AnalyticsError> {
        MetricKind::EVALUATED
            .iter()
            .map(|kind| self.summary(*kind))
            .collect()
    }

    // --- Per-metric accessors ---

    pub fn r_mean(&self) -> f64 {
        self.r.mean()
    }

    pub fn r_std(&self) -> f64 {
        self.r.std()
    }

    pub fn r_confidence(&self) -> Result<ConfidenceInterval, AnalyticsError> {
        self.r.confidence(self.confidence_level)
    }

    pub fn r2_mean(&self) -> f64 {
        self.r2.mean()
    }

    pub fn r2_std(&self) -> f64 {
        self.r2.std()
    }

    pub fn r2_confidence(&self) -> Result<ConfidenceInterval, AnalyticsError> {
        self.r2.confidence(self.confidence_level)
    }

    pub fn tau_mean(&self) -> f64 {
        self.tau.mean()
    }

    pub fn tau_std(&self) -> f64 {
        self.tau.std()
    }

    pub fn tau_confidence(&self) -> Result<ConfidenceInterval, AnalyticsError> {
        self.tau.confidence(self.confidence_level)
    }

    pub fn mue_mean(&self) -> f64 {
        self.mue.mean()
    }

    pub fn mue_std(&self) -> f64 {
        self.mue.std()
    }

    pub fn mue_confidence(&self) -> Result<ConfidenceInterval, AnalyticsError> {
        self.mue.confidence(self.confidence_level)
    }

    /// Predictive index summary. Always fails: the metric is not implemented.
    pub fn predictive_index(&self) -> Result<MetricSummary, AnalyticsError> {
        self.summary(MetricKind::PredictiveIndex)
    }
}
