use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn sample_then_list_round_trips_the_builtin_corpus() {
    let temp = tempdir().unwrap();
    let corpus = temp.path().join("sample.json");

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("sample")
        .arg("--output")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success();

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("list")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("HC-001"))
        .stdout(predicate::str::contains("FR-002"))
        .stdout(predicate::str::contains("Healthcare Services"))
        .stdout(predicate::str::contains("Banking"));
}

#[test]
fn inspect_reports_the_pattern_view() {
    let temp = tempdir().unwrap();
    let corpus = temp.path().join("sample.json");

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("sample")
        .arg("--output")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success();

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("inspect")
        .arg("HC-001")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcript: HC-001"))
        .stdout(predicate::str::contains("escalation"))
        .stdout(predicate::str::contains("Pattern library:"));
}

#[test]
fn inspect_unknown_id_fails() {
    let temp = tempdir().unwrap();
    let corpus = temp.path().join("sample.json");

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("sample")
        .arg("--output")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success();

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("inspect")
        .arg("NOPE-999")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
