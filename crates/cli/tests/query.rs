use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;

fn write_corpus(dir: &std::path::Path) -> std::path::PathBuf {
    let corpus = json!({
        "transcripts": [
            {
                "transcript_id": "fraud-1",
                "domain": "Banking",
                "intent": "Fraud Alert Investigation",
                "reason_for_call": "Unauthorized charge detected",
                "conversation": [
                    {"speaker": "Agent", "text": "Fraud department, how can I help?"},
                    {"speaker": "Customer", "text": "There is an unauthorized charge on my card."},
                    {"speaker": "Agent", "text": "I am blocking the card and reversing the charge."}
                ]
            },
            {
                "transcript_id": "login-1",
                "domain": "Healthcare Services",
                "intent": "Escalation - Repeated Failures",
                "reason_for_call": "Login issue for three weeks",
                "conversation": [
                    {"speaker": "Customer", "text": "My login issue is still not fixed. I want to speak with a supervisor."}
                ]
            }
        ]
    });
    let path = dir.join("corpus.json");
    fs::write(&path, serde_json::to_string_pretty(&corpus).unwrap()).unwrap();
    path
}

#[test]
fn query_json_honors_the_output_contract() {
    let temp = tempdir().unwrap();
    let corpus = write_corpus(temp.path());

    let output = Command::cargo_bin("convo")
        .expect("binary")
        .arg("query")
        .arg("why was the fraud charge reversed")
        .arg("--json")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["query"], "why was the fraud charge reversed");
    assert!(body["primary_cause"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("fraud"));
    assert_eq!(body["relevant_transcript_ids"][0], "fraud-1");

    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.6..=0.95).contains(&confidence), "confidence {confidence}");
    assert!(body["supporting_factors"].as_array().unwrap().len() <= 6);
    assert!(body["evidence_spans"].as_array().unwrap().len() <= 4);
    assert!(body["timestamp"].as_str().is_some());
}

#[test]
fn query_text_report_names_the_sections() {
    let temp = tempdir().unwrap();
    let corpus = write_corpus(temp.path());

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("query")
        .arg("why did the customer escalate to a supervisor")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("CAUSAL ANALYSIS RESULT"))
        .stdout(predicate::str::contains("PRIMARY CAUSE:"))
        .stdout(predicate::str::contains("CONFIDENCE:"))
        .stdout(predicate::str::contains("Relevant Transcripts:"));
}

#[test]
fn missing_corpus_file_exits_nonzero() {
    Command::cargo_bin("convo")
        .expect("binary")
        .arg("query")
        .arg("anything")
        .arg("--data")
        .arg("/nonexistent/corpus.json")
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read corpus"));
}

#[test]
fn empty_query_is_rejected() {
    let temp = tempdir().unwrap();
    let corpus = write_corpus(temp.path());

    Command::cargo_bin("convo")
        .expect("binary")
        .arg("query")
        .arg("   ")
        .arg("--data")
        .arg(&corpus)
        .arg("--quiet")
        .assert()
        .failure();
}
