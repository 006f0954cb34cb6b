//! Integration tests for the `ventcalc` binary.
//!
//! These tests use `assert_cmd` to verify:
//! - calc from flags and from a JSON input file
//! - JSON output and structured validation errors
//! - save / rerun round trip through a project file
//! - catalog listings and the ventcalc.toml defaults file

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ventcalc() -> Command {
    let mut cmd = Command::cargo_bin("ventcalc").expect("binary exists");
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run ventcalc");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// =============================================================================
// calc
// =============================================================================

#[test]
fn calc_still_air_reports_not_achievable() {
    ventcalc()
        .args(["calc", "--length", "40", "--width", "30", "--height", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Q_v = 2880.0 CFM"))
        .stdout(predicate::str::contains("N/A (not achievable)"))
        .stdout(predicate::str::contains("Natural ventilation is impossible"));
}

#[test]
fn calc_json_stack_only() {
    let value = json_stdout(ventcalc().args([
        "calc",
        "--length",
        "40",
        "--width",
        "30",
        "--height",
        "12",
        "--inside-temp",
        "90",
        "--outside-temp",
        "40",
        "--format",
        "json",
    ]));

    assert_eq!(value["required_ventilation_rate_cfm"], 2880.0);
    assert_eq!(value["free_vent_area"]["status"], "Achievable");
    assert_eq!(value["free_vent_area"], value["gross_inlet_area"]);
    assert!(value["free_vent_area"]["sq_ft"].as_f64().unwrap() > 0.0);
}

#[test]
fn calc_fugitive_from_leak_flags() {
    let value = json_stdout(ventcalc().args([
        "calc",
        "--length",
        "40",
        "--width",
        "30",
        "--height",
        "12",
        "--inside-temp",
        "90",
        "--outside-temp",
        "40",
        "--leak",
        "flange=10",
        "--lfl",
        "5",
        "--safety-factor",
        "0.25",
        "--format",
        "json",
    ]));

    let q = value["required_ventilation_rate_cfm"].as_f64().unwrap();
    assert!((q - 16.0).abs() < 1e-9);
    assert_eq!(value["airflow"]["method"], "FugitiveEmission");
    assert_eq!(value["airflow"]["basis"], "Itemized");
}

#[test]
fn calc_from_input_file() {
    let temp = TempDir::new().expect("create temp dir");
    let input_path = temp.path().join("input.json");
    fs::write(
        &input_path,
        r#"{
            "label": "Compressor Building",
            "length_ft": 60.0,
            "width_ft": 40.0,
            "height_ft": 16.0,
            "inside_temp_f": 95.0,
            "outside_temp_f": 20.0,
            "wind_velocity_mph": 5.0,
            "inlet_obstruction": "StandardLouver",
            "outlet_obstruction": { "Custom": 0.6 },
            "method": { "method": "AreaMethod" },
            "gas_type": "HeavierThanAir"
        }"#,
    )
    .expect("write input");

    ventcalc()
        .args(["calc", "--input", input_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressor Building"))
        .stdout(predicate::str::contains("heavier than air"))
        .stdout(predicate::str::contains("Floor area of 2400 sq ft exceeds 2000 sq ft"));
}

#[test]
fn calc_input_file_conflicts_with_input_flags() {
    let temp = TempDir::new().expect("create temp dir");
    let input_path = temp.path().join("input.json");
    fs::write(&input_path, r#"{ "length_ft": 40.0, "width_ft": 30.0, "height_ft": 12.0 }"#).expect("write input");

    for flag in [["--wind", "10"], ["--label", "Shed"], ["--terrain", "urban"], ["--lfl", "5"]] {
        ventcalc()
            .args(["calc", "--input", input_path.to_str().unwrap()])
            .args(flag)
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }

    ventcalc()
        .args(["calc", "--input", input_path.to_str().unwrap(), "--format", "json"])
        .assert()
        .success();
}

#[test]
fn calc_rejects_overflowing_geometry() {
    ventcalc()
        .args([
            "calc", "--length", "1e120", "--width", "1e120", "--height", "1e120", "--inside-temp", "90",
            "--outside-temp", "40", "--wind", "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Building volume is too large to compute"));
}

#[test]
fn calc_validation_error_names_every_field() {
    ventcalc()
        .args([
            "calc",
            "--length",
            "-5",
            "--width",
            "30",
            "--height",
            "0",
            "--inlet-obstruction",
            "1.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("length_ft"))
        .stderr(predicate::str::contains("height_ft"))
        .stderr(predicate::str::contains("inlet_obstruction"));
}

#[test]
fn calc_validation_error_as_json() {
    let output = ventcalc()
        .args([
            "calc",
            "--length",
            "40",
            "--width",
            "30",
            "--height",
            "12",
            "--method",
            "fugitive",
            "--format",
            "json",
        ])
        .output()
        .expect("run ventcalc");

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert_eq!(value["error_code"], "VALIDATION_FAILED");
    assert_eq!(
        value["fields"],
        serde_json::json!(["leak_sources", "lfl_percent", "safety_factor"])
    );
}

#[test]
fn calc_rejects_unknown_component() {
    ventcalc()
        .args([
            "calc", "--length", "40", "--width", "30", "--height", "12", "--leak", "gasket=3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gasket"));
}

// =============================================================================
// save / rerun
// =============================================================================

#[test]
fn save_then_rerun_reproduces_results() {
    let temp = TempDir::new().expect("create temp dir");
    let project = temp.path().join("station.vent");
    let project_arg = project.to_str().unwrap();

    ventcalc()
        .args([
            "calc",
            "--label",
            "Meter Building",
            "--length",
            "40",
            "--width",
            "30",
            "--height",
            "12",
            "--inside-temp",
            "88.3",
            "--outside-temp",
            "17.9",
            "--wind",
            "3.7",
            "--inlet-obstruction",
            "insect-screen",
            "--save",
            project_arg,
            "--project-name",
            "Station 12",
            "--goal",
            "reclassify",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved calculation"));

    ventcalc()
        .args([
            "calc", "--label", "Pump Shed", "--length", "12", "--width", "10", "--height", "9",
            "--inside-temp", "80", "--outside-temp", "30", "--save", project_arg,
        ])
        .assert()
        .success();

    ventcalc()
        .args(["rerun", project_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Station 12 (2 calculations)"))
        .stdout(predicate::str::contains("[MATCH] Meter Building"))
        .stdout(predicate::str::contains("[MATCH] Pump Shed"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&project).expect("read project")).expect("project JSON");
    assert_eq!(saved["calculations"][0]["goal"], "ReclassifyDiv1ToDiv2");
    assert_eq!(saved["meta"]["version"], "0.1.0");
}

#[test]
fn save_adds_project_extension() {
    let temp = TempDir::new().expect("create temp dir");
    let bare = temp.path().join("station");

    ventcalc()
        .args([
            "calc", "--length", "40", "--width", "30", "--height", "12", "--save", bare.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("station.vent"));

    assert!(temp.path().join("station.vent").exists());
    assert!(!bare.exists());
}

#[test]
fn rerun_detects_tampered_result() {
    let temp = TempDir::new().expect("create temp dir");
    let project = temp.path().join("tampered.vent");
    let project_arg = project.to_str().unwrap();

    ventcalc()
        .args([
            "calc", "--length", "40", "--width", "30", "--height", "12", "--inside-temp", "90",
            "--outside-temp", "40", "--save", project_arg,
        ])
        .assert()
        .success();

    let mut saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&project).expect("read project")).expect("project JSON");
    saved["calculations"][0]["result"]["required_ventilation_rate_cfm"] = serde_json::json!(1.0);
    fs::write(&project, serde_json::to_string_pretty(&saved).unwrap()).expect("write project");

    ventcalc()
        .args(["rerun", project_arg])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[DIFFERS]"));
}

#[test]
fn rerun_missing_file_fails() {
    let temp = TempDir::new().expect("create temp dir");
    ventcalc()
        .args(["rerun", temp.path().join("nope.vent").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load project"));
}

// =============================================================================
// catalogs and config
// =============================================================================

#[test]
fn components_lists_leak_table() {
    ventcalc()
        .arg("components")
        .assert()
        .success()
        .stdout(predicate::str::contains("compressor-seal"))
        .stdout(predicate::str::contains("2.15"));
}

#[test]
fn components_json() {
    let value = json_stdout(ventcalc().args(["components", "--format", "json"]));
    let rows = value.as_array().expect("array");
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[1]["code"], "flange");
    assert_eq!(rows[1]["leak_rate_cfm"], 0.02);
}

#[test]
fn factors_json_has_every_table() {
    let value = json_stdout(ventcalc().args(["factors", "--format", "json"]));
    assert_eq!(value["obstruction"].as_array().unwrap().len(), 6);
    assert_eq!(value["vent_type"].as_array().unwrap().len(), 3);
    assert_eq!(value["terrain"].as_array().unwrap().len(), 4);
    assert_eq!(value["orientation"].as_array().unwrap().len(), 3);
    assert_eq!(value["obstruction"][4]["id"], "StandardLouver");
}

#[test]
fn config_file_supplies_defaults() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("ventcalc.toml");
    fs::write(
        &config,
        r#"
format = "json"
lfl_percent = 5.0
safety_factor = 0.25

[settings]
default_obstruction = "StandardLouver"
"#,
    )
    .expect("write config");

    let value = json_stdout(ventcalc().current_dir(temp.path()).args([
        "calc",
        "--length",
        "40",
        "--width",
        "30",
        "--height",
        "12",
        "--inside-temp",
        "90",
        "--outside-temp",
        "40",
        "--leak",
        "flange=10",
    ]));

    assert!((value["required_ventilation_rate_cfm"].as_f64().unwrap() - 16.0).abs() < 1e-9);
    let free = value["free_vent_area"]["sq_ft"].as_f64().unwrap();
    let gross = value["gross_inlet_area"]["sq_ft"].as_f64().unwrap();
    assert!((gross - free / 0.55).abs() < 1e-9);
}

#[test]
fn invalid_config_file_fails() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("bad.toml");
    fs::write(&config, "format = 42").expect("write config");

    ventcalc()
        .args(["--config", config.to_str().unwrap(), "components"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}
