//! File-based tests for the loaders.

use core_types::EnergyUnit;
use loader::{AffinityKind, ExperimentalData, LoaderError, read_free_energies};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reads_free_energy_file() {
    let file = write_file("#compound,dG,err\nejm31,-0.95,0.15\nejm42,0.40,0.20\nejm43,NoPred,0.0\n");
    let series = read_free_energies(file.path(), EnergyUnit::KcalPerMol, "#").unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.get("ejm31").unwrap().uncertainty, Some(0.15));
}

#[test]
fn kd_file_with_custom_delimiter() {
    let file = write_file("ref\t2.0e-6\nstronger\t1.0e-6\n");
    let data = ExperimentalData::new(300.0);
    let energies = data
        .ddg_from_file(AffinityKind::Kd, file.path(), None, '\t')
        .unwrap();
    assert_eq!(energies.reference, "ref");
    let stronger = energies.kcal.get("stronger").unwrap();
    assert!(stronger.value < 0.0);
    assert!((stronger.value + data.rt(EnergyUnit::KcalPerMol) * 2.0_f64.ln()).abs() < 1e-12);
}

#[test]
fn ic50_file_round_trips_through_reference() {
    let file = write_file("a,5.0\nb,50.0\nc,0.5\n");
    let energies = ExperimentalData::default()
        .ddg_from_file(AffinityKind::Ic50, file.path(), Some("b"), ',')
        .unwrap();
    assert_eq!(energies.reference, "b");
    assert_eq!(energies.kj.len(), 3);
    assert!(energies.kj.get("c").unwrap().value < energies.kj.get("a").unwrap().value);
}

#[test]
fn missing_file_reports_path() {
    let err = read_free_energies("/nonexistent/freenrg.csv", EnergyUnit::KcalPerMol, "#")
        .unwrap_err();
    match err {
        LoaderError::Io { path, .. } => assert!(path.ends_with("freenrg.csv")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
