//! # Configuration
//!
//! Loads the runtime settings of the `freenrg` tool and installs its logging.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `FREENRG` (nested keys separated by
//! `__`, e.g. `FREENRG__STATISTICS__REPEATS=5000`). Command-line flags are
//! applied on top by the binary.

use config::builder::{ConfigBuilder, DefaultState};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{Config, ExperimentSettings, LoggingSettings, StatisticsSettings};

/// File read from the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "freenrg.toml";
/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "FREENRG";

/// Loads the application configuration.
///
/// With `Some(path)` the file must exist. With `None`, `freenrg.toml` in the
/// working directory is read if present and defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    finish(config::Config::builder().add_source(file))
}

/// Loads the configuration from TOML text instead of a file.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    finish(
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Config>()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let stats = &config.statistics;
    if stats.repeats == 0 {
        return Err(ConfigError::ValidationError(
            "statistics.repeats must be at least 1".to_string(),
        ));
    }

    let temperature = config.experiment.temperature;
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "experiment.temperature must be a positive number of kelvin, got {temperature}"
        )));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }
    Ok(())
}
