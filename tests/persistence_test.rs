use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_state_survives_across_sessions() {
    let dir = tempdir().unwrap();

    // 1. First run: record an adjustment.
    let mut cmd1 = Command::new(cargo_bin!("tallybook"));
    cmd1.arg("--data-dir")
        .arg(dir.path())
        .args(["add", "100", "-d", "seed"]);
    cmd1.assert().success();

    // 2. Second run over the same data dir sees the recovered balance.
    let mut cmd2 = Command::new(cargo_bin!("tallybook"));
    cmd2.arg("--data-dir")
        .arg(dir.path())
        .args(["add", "50", "-d", "more"]);
    cmd2.assert()
        .success()
        .stdout(predicate::str::contains("balance 150"));
}

#[test]
fn test_corrupt_snapshot_degrades_to_defaults() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("tallybook.json"), "]]] not json").unwrap();

    let mut cmd = Command::new(cargo_bin!("tallybook"));
    cmd.arg("--data-dir").arg(dir.path()).arg("show");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("balance: 0"));
}

#[test]
fn test_snapshot_file_holds_full_state() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::new(cargo_bin!("tallybook"));
    cmd.arg("--data-dir")
        .arg(dir.path())
        .args(["add", "10*2", "-d", "double"]);
    cmd.assert().success();

    let text = std::fs::read_to_string(dir.path().join("tallybook.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value["history"].is_array());
    assert_eq!(value["history"][0]["expr"], "+10*2");
}
