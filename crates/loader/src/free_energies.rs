use crate::error::LoaderError;
use crate::{NO_PREDICTION, parse_number, read_file};
use core_types::{EnergyUnit, MeasurementRecord, Series};
use std::path::Path;

/// Reads `name,value,error` lines of free energies in kcal/mol.
///
/// Lines starting with `comment` and blank lines are skipped, as are compounds
/// whose value is `NoPred`.
pub fn read_free_energies(
    path: impl AsRef<Path>,
    unit: EnergyUnit,
    comment: &str,
) -> Result<Series, LoaderError> {
    if unit != EnergyUnit::KcalPerMol {
        return Err(LoaderError::UnsupportedUnit(unit));
    }
    let text = read_file(path.as_ref())?;
    parse_free_energies(&text, unit, comment)
}

pub fn parse_free_energies(
    text: &str,
    unit: EnergyUnit,
    comment: &str,
) -> Result<Series, LoaderError> {
    if unit != EnergyUnit::KcalPerMol {
        return Err(LoaderError::UnsupportedUnit(unit));
    }

    let mut series = Series::default();
    let mut skipped = 0usize;
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() || (!comment.is_empty() && line.starts_with(comment)) {
            continue;
        }

        let mut fields = line.split(',');
        let id = fields.next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(LoaderError::Parse {
                line: line_no,
                message: "missing compound name".to_string(),
            });
        }
        let value_field = fields.next();
        if value_field.map(str::trim) == Some(NO_PREDICTION) {
            skipped += 1;
            continue;
        }
        let value = parse_number(value_field, line_no, "free energy")?;
        let error = parse_number(fields.next(), line_no, "error")?;

        series.push(MeasurementRecord::with_uncertainty(id, value, error))?;
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped compounds without a prediction.");
    }
    if series.is_empty() {
        return Err(LoaderError::Empty);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_values_and_errors() {
        let text = "# name,dG,err\nlig1,-1.25,0.10\nlig2, 0.50 , 0.20 \n\nlig3,NoPred,0.0\n";
        let series = parse_free_energies(text, EnergyUnit::KcalPerMol, "#").unwrap();
        assert_eq!(series.ids().collect::<Vec<_>>(), vec!["lig1", "lig2"]);
        let lig2 = series.get("lig2").unwrap();
        assert_eq!(lig2.value, 0.5);
        assert_eq!(lig2.uncertainty, Some(0.2));
    }

    #[test]
    fn test_custom_comment_prefix() {
        let text = "% header\nlig1,1.0,0.1\n";
        let series = parse_free_energies(text, EnergyUnit::KcalPerMol, "%").unwrap();
        assert_eq!(series.len(), 1);
        assert!(parse_free_energies(text, EnergyUnit::KcalPerMol, "#").is_err());
    }

    #[test]
    fn test_kj_not_supported() {
        let err = parse_free_energies("a,1.0,0.1\n", EnergyUnit::KjPerMol, "#").unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedUnit(EnergyUnit::KjPerMol)));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let err = parse_free_energies("a,1.0,0.1\nb,nan,0.1\n", EnergyUnit::KcalPerMol, "#")
            .unwrap_err();
        assert!(matches!(err, LoaderError::Parse { line: 2, .. }));

        let err = parse_free_energies("a,1.0,inf\n", EnergyUnit::KcalPerMol, "#").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { line: 1, .. }));

        let err = parse_free_energies("a,-infinity,0.1\n", EnergyUnit::KcalPerMol, "#").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_error_column() {
        let err = parse_free_energies("a,1.0\n", EnergyUnit::KcalPerMol, "#").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { line: 1, .. }));
    }
}
