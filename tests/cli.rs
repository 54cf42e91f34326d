use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const CATALOG: &str = r#"
operators:
  - id: 1
    name: Bavaria
ground_stations:
  - id: 1
    name: Oberpfaffenhofen
    operators: [1]
    antennas:
      - id: 11
        name: OP-X
        latitude: 48.0
        longitude: 11.0
        altitude: 600.0
        gt_dbw_k: 30.0
        links:
          - frequency_min_mhz: 8000
            frequency_max_mhz: 8500
            downlink: true
"#;

fn write_inputs(dir: &Path, antennas: &str) -> (PathBuf, PathBuf) {
    let catalog_path = dir.join("catalog.yaml");
    File::create(&catalog_path)
        .and_then(|mut f| f.write_all(CATALOG.as_bytes()))
        .expect("catalog write");

    let request_path = dir.join("request.yaml");
    let mut file = File::create(&request_path).expect("request create");
    writeln!(
        file,
        "tle: |
  ISS (ZARYA)
  1 25544U 98067A   24001.50000000  .00016717  00000-0  30302-3 0  9995
  2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.49815308432596
start: 2024-01-01T12:00:00Z
end: 2024-01-01T18:00:00Z
data_volume: 100 MB
transmitter:
  eirp: 10 W
  frequency_min: 8025 MHz
  frequency_max: 8400 MHz
antennas: {antennas}"
    )
    .unwrap();
    (catalog_path, request_path)
}

fn bin() -> Command {
    Command::cargo_bin("downlink-o-mat").expect("downlink-o-mat bin")
}

#[test]
fn validate_lists_selected_antennas() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (catalog, request) = write_inputs(dir.path(), "[11]");

    bin()
        .args(["validate", request.to_str().unwrap(), "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Request is valid"))
        .stdout(predicate::str::contains("OP-X @ Oberpfaffenhofen"));
}

#[test]
fn analyze_prints_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (catalog, request) = write_inputs(dir.path(), "[11]");

    let output = bin()
        .args(["analyze", request.to_str().unwrap(), "--catalog"])
        .arg(&catalog)
        .output()
        .expect("run analyze");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["result"]["mode"], "ground_stations");
    assert_eq!(report["satellite"]["norad_id"], 25544);
    assert!(report["ground_track"].as_array().is_some_and(|t| !t.is_empty()));
}

#[test]
fn mode_flag_overrides_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (catalog, request) = write_inputs(dir.path(), "[11]");

    bin()
        .args(["analyze", request.to_str().unwrap(), "--mode", "orbit_only"])
        .args(["--format", "yaml", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: orbit_only"));
}

#[test]
fn missing_catalog_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (_, request) = write_inputs(dir.path(), "[11]");

    bin()
        .args(["analyze", request.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog given"));
}

#[test]
fn unknown_antenna_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (catalog, request) = write_inputs(dir.path(), "[11, 99]");

    bin()
        .args(["validate", request.to_str().unwrap(), "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}
