use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single entity's free energy, with an optional fixed uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub id: String,
    pub value: f64,
    /// One standard deviation. `None` means the value is exact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
}

impl MeasurementRecord {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            uncertainty: None,
        }
    }

    pub fn with_uncertainty(id: impl Into<String>, value: f64, uncertainty: f64) -> Self {
        Self {
            id: id.into(),
            value,
            uncertainty: Some(uncertainty),
        }
    }

    /// The uncertainty used for resampling; absent is treated as zero.
    pub fn uncertainty_or_zero(&self) -> f64 {
        self.uncertainty.unwrap_or(0.0)
    }
}

/// An ordered collection of measurements, at most one per entity.
///
/// Produced once by a loader and treated as immutable input by the
/// statistics engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MeasurementRecord>", into = "Vec<MeasurementRecord>")]
pub struct Series {
    records: Vec<MeasurementRecord>,
}

impl Series {
    pub fn new(records: Vec<MeasurementRecord>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(CoreError::DuplicateEntity(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Appends a record, rejecting identifiers already present.
    pub fn push(&mut self, record: MeasurementRecord) -> Result<(), CoreError> {
        if self.get(&record.id).is_some() {
            return Err(CoreError::DuplicateEntity(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&MeasurementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Entity identifiers in series order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasurementRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<MeasurementRecord>> for Series {
    type Error = CoreError;

    fn try_from(records: Vec<MeasurementRecord>) -> Result<Self, Self::Error> {
        Series::new(records)
    }
}

impl From<Series> for Vec<MeasurementRecord> {
    fn from(series: Series) -> Self {
        series.records
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a MeasurementRecord;
    type IntoIter = std::slice::Iter<'a, MeasurementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
