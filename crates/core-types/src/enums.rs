use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two compared series a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesSide {
    Computed,
    Experimental,
}

impl fmt::Display for SeriesSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesSide::Computed => write!(f, "computed"),
            SeriesSide::Experimental => write!(f, "experimental"),
        }
    }
}

/// Energy unit a series of free energies is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    KcalPerMol,
    KjPerMol,
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyUnit::KcalPerMol => write!(f, "kcal/mol"),
            EnergyUnit::KjPerMol => write!(f, "kJ/mol"),
        }
    }
}
