//! # Free Energy Loaders
//!
//! Readers that turn measurement files into the `Series` consumed by the
//! `analytics` crate.
//!
//! - `ExperimentalData` converts IC50 or Kd measurements into relative binding
//!   free energies against a reference compound, in kcal/mol and kJ/mol.
//! - `read_free_energies` reads already computed free energies with their errors.
//!
//! Every file reader has a `*_str` counterpart that parses in-memory text.

pub mod affinity;
pub mod error;
pub mod free_energies;

pub use affinity::{Affinity, AffinityKind, ExperimentalData, FreeEnergies};
pub use error::LoaderError;
pub use free_energies::{parse_free_energies, read_free_energies};

/// Molar gas constant in kcal/(mol·K).
pub const GAS_CONSTANT_KCAL: f64 = 0.0019872041;

/// Molar gas constant in kJ/(mol·K).
pub const GAS_CONSTANT_KJ: f64 = 0.0083144621;

/// Temperature in kelvin used when none is given.
pub const DEFAULT_TEMPERATURE: f64 = 300.0;

/// Marker used in free energy files for compounds without a prediction.
pub const NO_PREDICTION: &str = "NoPred";

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, LoaderError> {
    tracing::info!(path = %path.display(), "Reading measurement file.");
    std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_number(field: Option<&str>, line: usize, what: &str) -> Result<f64, LoaderError> {
    let field = field.map(str::trim).ok_or_else(|| LoaderError::Parse {
        line,
        message: format!("missing {what}"),
    })?;
    let value = field.parse::<f64>().map_err(|e| LoaderError::Parse {
        line,
        message: format!("invalid {what} '{field}': {e}"),
    })?;
    if !value.is_finite() {
        return Err(LoaderError::Parse {
            line,
            message: format!("{what} must be a finite number, got '{field}'"),
        });
    }
    Ok(value)
}
