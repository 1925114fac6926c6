// tests/cli_tests.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LOG: &str = "fw date=2024-05-01 srcname=\"Alice PC\" dstip=10.0.0.5\n\
fw date=2024-05-01 srcname=bob dstip=10.0.0.6\n\
fw date=2024-05-02 srcname=carol url=/a\n";

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("traffic.log");
    fs::write(&log, LOG).unwrap();
    let history = dir.path().join("history.json");
    (dir, log, history)
}

fn kvsift(history: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kvsift").unwrap();
    cmd.arg("--history-file").arg(history);
    cmd
}

#[test]
fn test_list_fields() {
    let (_dir, log, history) = setup();
    kvsift(&history)
        .arg(&log)
        .arg("--list-fields")
        .assert()
        .success()
        .stdout("  date\n  srcname\n  dstip\n  url\n");
}

#[test]
fn test_stdout_with_keys_filter_and_context() {
    let (_dir, log, history) = setup();
    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "--color", "never", "-k", "srcname", "-f", "BOB", "-C", "1"])
        .assert()
        .success()
        .stdout("fw srcname=Alice PC\nfw srcname=bob\nfw srcname=carol\n");
    // printing does not touch the history
    assert!(!history.exists());
}

#[test]
fn test_stdout_exclude() {
    let (_dir, log, history) = setup();
    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "--color", "never", "-k", "dstip,url", "-f", "10.0.0", "-x"])
        .assert()
        .success()
        .stdout("fw url=/a\n");
}

#[test]
fn test_negative_context_fails() {
    let (_dir, log, history) = setup();
    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "-C", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn test_missing_input_fails() {
    let (dir, _log, history) = setup();
    kvsift(&history)
        .arg(dir.path().join("nope.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read log file"));
}

#[test]
fn test_save_writes_results_and_remembers_selection() {
    let (dir, log, history) = setup();
    let assert = kvsift(&history)
        .arg(&log)
        .args(["-k", "date,srcname", "-f", "carol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("traffic_results_"));

    let printed = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let written = PathBuf::from(printed.trim());
    assert_eq!(written.parent(), Some(dir.path()));
    assert_eq!(
        fs::read_to_string(&written).unwrap(),
        "fw date=2024-05-02 srcname=carol\n"
    );

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&history).unwrap()).unwrap();
    assert_eq!(
        stored,
        serde_json::json!([{ "date": true, "srcname": true, "dstip": false, "url": false }])
    );

    // the stored selection becomes the default
    kvsift(&history)
        .arg(&log)
        .arg("--list-fields")
        .assert()
        .success()
        .stdout("* date\n* srcname\n  dstip\n  url\n");

    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "--color", "never", "-f", "bob"])
        .assert()
        .success()
        .stdout("fw date=2024-05-01 srcname=bob\n");
}

#[test]
fn test_from_history_out_of_range() {
    let (_dir, log, history) = setup();
    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "--from-history", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stored selection #2"));
}

#[test]
fn test_corrupt_history_is_not_fatal() {
    let (_dir, log, history) = setup();
    fs::write(&history, "not json at all").unwrap();
    kvsift(&history)
        .arg(&log)
        .args(["--stdout", "--color", "never", "-k", "dstip", "-f", "alice"])
        .assert()
        .success()
        .stdout("fw dstip=10.0.0.5\n");
}
