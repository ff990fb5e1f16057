use crate::metrics::MetricKind;
use core_types::SeriesSide;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No compounds to compare: the compound list is empty")]
    EmptyCompoundSet,

    #[error("Compound '{id}' was not found in the {side} series")]
    EntityNotFound { id: String, side: SeriesSide },

    #[error("Repeat count must be positive, got {0}")]
    InvalidRepeats(usize),

    #[error("Compound '{id}' has an invalid uncertainty of {value}")]
    InvalidUncertainty { id: String, value: f64 },

    #[error("Quantile index {index} is outside a distribution of {len} draws")]
    QuantileOutOfRange { index: i64, len: usize },

    #[error("Metric '{0}' is not implemented")]
    NotImplemented(MetricKind),
}
