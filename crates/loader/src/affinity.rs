use crate::error::LoaderError;
use crate::{DEFAULT_TEMPERATURE, GAS_CONSTANT_KCAL, GAS_CONSTANT_KJ, parse_number, read_file};
use core_types::{EnergyUnit, MeasurementRecord, Series};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The kind of binding measurement in an affinity file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffinityKind {
    Ic50,
    Kd,
}

impl fmt::Display for AffinityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffinityKind::Ic50 => write!(f, "IC50"),
            AffinityKind::Kd => write!(f, "Kd"),
        }
    }
}

/// One raw affinity measurement as read from file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affinity {
    pub id: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

/// Relative free energies derived from a set of affinity measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeEnergies {
    /// The compound every value is relative to.
    pub reference: String,
    /// The measurements the free energies were derived from, in file order.
    pub affinities: Vec<Affinity>,
    pub kcal: Series,
    pub kj: Series,
}

impl FreeEnergies {
    pub fn in_unit(&self, unit: EnergyUnit) -> &Series {
        match unit {
            EnergyUnit::KcalPerMol => &self.kcal,
            EnergyUnit::KjPerMol => &self.kj,
        }
    }

    /// Compound names in file order.
    pub fn compound_list(&self) -> Vec<&str> {
        self.affinities.iter().map(|a| a.id.as_str()).collect()
    }
}

/// Converts experimental affinities into relative binding free energies.
///
/// `ΔΔG_i = RT ln(x_i / x_ref)` for IC50 or Kd values `x`. Each result carries
/// an uncertainty of `RT ln 2`, i.e. a factor of two in the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentalData {
    temperature: f64,
}

impl Default for ExperimentalData {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE)
    }
}

impl ExperimentalData {
    /// `temperature` in kelvin.
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Thermal energy RT in the given unit.
    pub fn rt(&self, unit: EnergyUnit) -> f64 {
        match unit {
            EnergyUnit::KcalPerMol => GAS_CONSTANT_KCAL * self.temperature,
            EnergyUnit::KjPerMol => GAS_CONSTANT_KJ * self.temperature,
        }
    }

    /// Reads `name,ic50[,smiles]` lines and converts them to free energies.
    ///
    /// The reference defaults to the first compound in the file.
    pub fn ddg_from_ic50(
        &self,
        path: impl AsRef<Path>,
        reference: Option<&str>,
        with_smiles: bool,
    ) -> Result<FreeEnergies, LoaderError> {
        let text = read_file(path.as_ref())?;
        self.ddg_from_ic50_str(&text, reference, with_smiles)
    }

    pub fn ddg_from_ic50_str(
        &self,
        text: &str,
        reference: Option<&str>,
        with_smiles: bool,
    ) -> Result<FreeEnergies, LoaderError> {
        let affinities = parse_affinities(text, ',', with_smiles)?;
        self.convert(affinities, reference)
    }

    /// Reads `name<delimiter>kd` lines and converts them to free energies.
    pub fn ddg_from_kd(
        &self,
        path: impl AsRef<Path>,
        reference: Option<&str>,
        delimiter: char,
    ) -> Result<FreeEnergies, LoaderError> {
        let text = read_file(path.as_ref())?;
        self.ddg_from_kd_str(&text, reference, delimiter)
    }

    pub fn ddg_from_kd_str(
        &self,
        text: &str,
        reference: Option<&str>,
        delimiter: char,
    ) -> Result<FreeEnergies, LoaderError> {
        let affinities = parse_affinities(text, delimiter, false)?;
        self.convert(affinities, reference)
    }

    /// Dispatches to the IC50 or Kd reader. IC50 files are always comma separated.
    pub fn ddg_from_file(
        &self,
        kind: AffinityKind,
        path: impl AsRef<Path>,
        reference: Option<&str>,
        delimiter: char,
    ) -> Result<FreeEnergies, LoaderError> {
        match kind {
            AffinityKind::Ic50 => self.ddg_from_ic50(path, reference, false),
            AffinityKind::Kd => self.ddg_from_kd(path, reference, delimiter),
        }
    }

    fn convert(
        &self,
        affinities: Vec<Affinity>,
        reference: Option<&str>,
    ) -> Result<FreeEnergies, LoaderError> {
        let reference_affinity = match reference {
            Some(name) => affinities
                .iter()
                .find(|a| a.id == name)
                .ok_or_else(|| LoaderError::UnknownReference(name.to_string()))?,
            None => affinities.first().ok_or(LoaderError::Empty)?,
        };
        let reference_value = reference_affinity.value;
        let reference = reference_affinity.id.clone();

        let rt_kcal = self.rt(EnergyUnit::KcalPerMol);
        let rt_kj = self.rt(EnergyUnit::KjPerMol);
        let mut kcal = Series::default();
        let mut kj = Series::default();
        for affinity in &affinities {
            let log_ratio = (affinity.value / reference_value).ln();
            kcal.push(MeasurementRecord::with_uncertainty(
                affinity.id.clone(),
                rt_kcal * log_ratio,
                rt_kcal * std::f64::consts::LN_2,
            ))?;
            kj.push(MeasurementRecord::with_uncertainty(
                affinity.id.clone(),
                rt_kj * log_ratio,
                rt_kj * std::f64::consts::LN_2,
            ))?;
        }

        tracing::debug!(
            reference = %reference,
            compounds = affinities.len(),
            temperature = self.temperature,
            "Converted affinities to relative free energies."
        );
        Ok(FreeEnergies {
            reference,
            affinities,
            kcal,
            kj,
        })
    }
}

fn parse_affinities(
    text: &str,
    delimiter: char,
    with_smiles: bool,
) -> Result<Vec<Affinity>, LoaderError> {
    let mut affinities = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(delimiter);
        let id = fields.next().unwrap_or_default().trim().to_string();
        if id.is_empty() {
            return Err(LoaderError::Parse {
                line: line_no,
                message: "missing compound name".to_string(),
            });
        }
        let value = parse_number(fields.next(), line_no, "affinity")?;
        if value.is_nan() || value <= 0.0 {
            return Err(LoaderError::Parse {
                line: line_no,
                message: format!("affinity of '{id}' must be positive, got {value}"),
            });
        }
        let smiles = if with_smiles {
            fields
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        } else {
            None
        };

        affinities.push(Affinity { id, value, smiles });
    }

    if affinities.is_empty() {
        return Err(LoaderError::Empty);
    }
    Ok(affinities)
}
