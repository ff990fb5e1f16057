//! # Free Energy Agreement Statistics
//!
//! This crate compares a computed series of relative binding free energies against an
//! experimental one and quantifies how well they agree, including the effect of the
//! computed values' uncertainties.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files or
//!   plotting. It depends only on `core-types` (Layer 0).
//! - **Immutable Results:** The `StatisticsEngine` holds configuration only. Each call to
//!   `generate_statistics` resamples the computed series and returns a fresh
//!   `StatisticsReport`; nothing is carried over between calls.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: Resolves the compared compounds, draws Gaussian resamples and
//!   evaluates every metric per draw.
//! - `StatisticsReport`: The per-metric distributions with mean, standard deviation and
//!   empirical confidence interval accessors.
//! - `MetricKind`: The metrics known to the crate, including the not yet implemented
//!   predictive index.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod distribution;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use distribution::{ConfidenceInterval, MetricDistribution};
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use metrics::MetricKind;
pub use report::{MetricSummary, PairedValues, StatisticsReport};

/// Default confidence level, one standard deviation under a normal assumption.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.68;

/// Default number of resample draws per run.
pub const DEFAULT_REPEATS: usize = 1000;
