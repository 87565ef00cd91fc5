//! CLI integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn demandcast() -> Command {
    cargo_bin_cmd!("demandcast")
}

#[test]
fn help_lists_subcommands() {
    demandcast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("predict"));
}

#[test]
fn version_prints_package_name() {
    demandcast()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("demandcast"));
}

#[test]
fn predict_help_lists_required_arguments() {
    demandcast()
        .args(["predict", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--product"))
        .stdout(predicate::str::contains("--date"))
        .stdout(predicate::str::contains("--unit-price"));
}

#[test]
fn predict_rejects_malformed_date() {
    demandcast()
        .args([
            "predict",
            "--product",
            "milk",
            "--category",
            "beverages",
            "--date",
            "tomorrow",
            "--region",
            "south",
            "--unit-price",
            "5.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tomorrow"));
}

#[test]
fn predict_without_trained_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = demandcast()
        .current_dir(dir.path())
        .args([
            "predict",
            "--product",
            "milk",
            "--category",
            "beverages",
            "--date",
            "2024-02-01",
            "--region",
            "south",
            "--unit-price",
            "5.5",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        combined.contains("no trained model"),
        "unexpected output: {combined}"
    );
}

#[test]
fn train_without_data_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = demandcast()
        .current_dir(dir.path())
        .args(["train", "--model", "gbdt"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        combined.contains("no data loaded"),
        "unexpected output: {combined}"
    );
}
