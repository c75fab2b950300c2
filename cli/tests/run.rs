use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn cassia(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cassia").expect("cassia binary");
    cmd.env("CASSIA_HOME", home)
        .env_remove("RUST_LOG")
        .args(["-c", "stage_delays_ms=[0,0,0,0]", "-c", "color=false"]);
    cmd
}

#[test]
fn spleen_with_cd19_reports_follicular_b_cells() {
    let home = tempfile::tempdir().expect("tempdir");
    cassia(home.path())
        .args([
            "run",
            "--quiet",
            "--tissue",
            "Spleen",
            "--markers",
            "Cd19, Pax5",
            "--species",
            "Mouse",
            "--tab",
            "summary",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Main Cell Type: Follicular B cells (FoB)",
        ))
        .stdout(predicate::str::contains("[Summary]"))
        .stdout(predicate::str::contains("Validation Check").not());
}

#[test]
fn json_output_carries_the_report_fields() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = cassia(home.path())
        .args(["run", "--quiet", "--json", "--tissue", "liver", "--markers", "Alb"])
        .output()
        .expect("run cassia");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["cellType"], "Hepatocytes");
    let score = report["score"].as_u64().expect("numeric score");
    assert!((90..=99).contains(&score), "{score}");
}

#[test]
fn animated_run_prints_every_stage_to_stderr() {
    let home = tempfile::tempdir().expect("tempdir");
    cassia(home.path())
        .args(["run", "--tissue", "brain", "--markers", "Gfap", "--tab", "quality"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Input Parameters"))
        .stderr(predicate::str::contains("Tissue Type: brain"))
        .stderr(predicate::str::contains("Workflow Complete!"))
        .stdout(predicate::str::contains("Quality Assessment"));
}

#[test]
fn tissue_outside_presets_needs_custom_flag() {
    let home = tempfile::tempdir().expect("tempdir");
    cassia(home.path())
        .args(["run", "--quiet", "--tissue", "esophagus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "\"esophagus\" is not one of the tissue type presets",
        ));

    cassia(home.path())
        .args([
            "run",
            "--quiet",
            "--custom-tissue",
            "--tissue",
            "esophagus",
            "--scenario",
            "esophagus-icc",
            "--tab",
            "summary",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interstitial Cells of Cajal (ICCs)"));
}

#[test]
fn request_file_and_config_file_are_honoured() {
    let home = tempfile::tempdir().expect("tempdir");
    fs::write(
        home.path().join("config.toml"),
        "scenario = \"esophagus-icc\"\n",
    )
    .expect("write config");
    let request = home.path().join("request.yaml");
    fs::write(
        &request,
        "tissue_type: pancreas\nmarker_gene: Ins1\nspecies: Human\n",
    )
    .expect("write request");

    cassia(home.path())
        .args(["run", "--quiet", "--tab", "summary", "--input"])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Interstitial Cells of Cajal"));

    cassia(home.path())
        .args(["run", "--quiet", "--tab", "summary", "--scenario", "profile", "--input"])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Cell Type: Follicular B cells\n"));
}

#[test]
fn presets_and_marker_lookup() {
    let home = tempfile::tempdir().expect("tempdir");
    cassia(home.path())
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("bone_marrow"))
        .stdout(predicate::str::contains("Hematopoietic stem cells"))
        .stdout(predicate::str::contains("esophagus-icc"));

    cassia(home.path())
        .args(["marker", "ms4a1", "Foo1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ms4a1: CD20, pan-B cell surface marker",
        ))
        .stdout(predicate::str::contains(
            "Foo1: Marker associated with the identified cell population",
        ));
}

#[test]
fn malformed_override_is_reported() {
    let home = tempfile::tempdir().expect("tempdir");
    cassia(home.path())
        .args(["run", "--quiet", "-c", "wrap_width"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing '='"));

    cassia(home.path())
        .args(["run", "--quiet", "-c", "scenaro=esophagus-icc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field `scenaro`"));
}
