use core_types::{CoreError, EnergyUnit};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Reference compound '{0}' is not in the data set")]
    UnknownReference(String),

    #[error("Reading free energies in {0} is not supported")]
    UnsupportedUnit(EnergyUnit),

    #[error("No measurements found")]
    Empty,

    #[error(transparent)]
    Core(#[from] CoreError),
}
