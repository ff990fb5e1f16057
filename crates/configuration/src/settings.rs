use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub statistics: StatisticsSettings,
    #[serde(default)]
    pub experiment: ExperimentSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Contains parameters for the bootstrap statistics engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Width of the empirical confidence interval. 0.68 is one sigma.
    /// Values outside [0, 1] are accepted; the engine warns about them.
    pub confidence_level: f64,
    /// Number of Gaussian resample draws per run.
    pub repeats: usize,
    /// Fixed seed for reproducible runs. Unset draws from the OS.
    pub seed: Option<u64>,
    /// Evaluate draws on all cores.
    pub parallel: bool,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.68,
            repeats: 1000,
            seed: None,
            parallel: false,
        }
    }
}

/// Contains parameters for converting experimental affinities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExperimentSettings {
    /// Temperature in kelvin used for RT.
    pub temperature: f64,
    /// Prefix of comment lines in free energy files.
    pub comment: String,
    /// Field separator in Kd files.
    pub delimiter: char,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            temperature: 300.0,
            comment: "#".to_string(),
            delimiter: ',',
        }
    }
}

/// Contains parameters for log output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
