//! Basic CLI E2E tests.
//!
//! Tests run the built binary with HOME pointed at a scratch directory so the
//! user's real configuration is never touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timebuddy"))
        .args(args)
        .env("HOME", home)
        .env_remove("TIMEBUDDY_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

const REQUEST: &str = r#"{
    "tasks": [
        {"task_id": 1, "name": "Client call", "priority": "high",
         "initialising_time": "2024-03-04T09:00:00Z", "deadline_time": "2024-03-04T17:00:00Z",
         "time_needed_minutes": 30, "fixed": true},
        {"task_id": 2, "name": "Draft proposal", "priority": "medium",
         "initialising_time": "2024-03-04T09:00:00Z", "deadline_time": "2024-03-04T17:00:00Z",
         "time_needed_minutes": 50}
    ],
    "day_start": "2024-03-04T09:00:00Z",
    "day_end": "2024-03-04T17:00:00Z"
}"#;

#[test]
fn test_schedule_outputs_response_json() {
    let home = tempfile::tempdir().unwrap();
    let request = home.path().join("request.json");
    std::fs::write(&request, REQUEST).unwrap();

    let args = [
        "schedule",
        request.to_str().unwrap(),
        "--seed",
        "7",
        "--iterations",
        "50",
    ];
    let (stdout, stderr, code) = run_cli(home.path(), &args);
    assert_eq!(code, 0, "schedule failed: {stderr}");

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["final_score"], 0.0);
    assert_eq!(json["timeline"].as_array().unwrap().len(), 6);
    assert_eq!(json["task_summary"][0]["status"], "COMPLETED");
    assert_eq!(json["task_summary"][1]["status"], "COMPLETED");
}

#[test]
fn test_schedule_rejects_missing_file() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["schedule", "/nonexistent/request.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_predict_untrained_returns_default() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["predict", "Write report"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["duration_minutes"], 30);
}

#[test]
fn test_predict_rejects_empty_name() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["predict", "   "]);
    assert_ne!(code, 0);
}

#[test]
fn test_retrain_skips_small_history() {
    let home = tempfile::tempdir().unwrap();
    let history = home.path().join("history.json");
    let items = r#"[{"task_name": "Water plants", "priority": "low", "actual_duration_minutes": 10}]"#;
    std::fs::write(&history, items).unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["retrain", history.to_str().unwrap()]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "skipped_training");
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let key = "scheduler.max_iterations";
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", key, "25"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "scheduler.max_iterations = 25");
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", key]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "scheduler.bogus"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_seed_can_be_cleared() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "scheduler.seed", "11"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "scheduler.seed"]);
    assert_eq!(stdout.trim(), "11");

    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "scheduler.seed", "none"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "scheduler.seed unset");
    let (_, _, code) = run_cli(home.path(), &["config", "get", "scheduler.seed"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_path_points_into_home() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    let expected = home.path().join(".config/timebuddy/config.toml");
    assert_eq!(Path::new(stdout.trim()), expected);
}

#[test]
fn test_log_task_accumulates_and_retrains() {
    let home = tempfile::tempdir().unwrap();
    let key = "predictor.min_training_samples";
    let (_, _, code) = run_cli(home.path(), &["config", "set", key, "2"]);
    assert_eq!(code, 0);

    let (stdout, stderr, code) = run_cli(home.path(), &["log-task", "File taxes", "high", "90"]);
    assert_eq!(code, 0, "log-task failed: {stderr}");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["history_len"], 1);
    assert!(json.get("retrain").is_none());

    let (stdout, _, code) = run_cli(home.path(), &["log-task", "Water plants", "LOW", "10"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["history_len"], 2);
    assert_eq!(json["retrain"]["status"], "training_complete");

    let model = home.path().join(".config/timebuddy/keyword_model.json");
    assert!(model.exists());

    // Without a file argument, retrain reads the logged history.
    let (stdout, _, code) = run_cli(home.path(), &["retrain"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "training_complete");
}

#[test]
fn test_log_task_rejects_bad_input() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["log-task", "Nap", "urgent", "20"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(home.path(), &["log-task", "Nap", "low", "0"]);
    assert_ne!(code, 0);

    let (_, stderr, code) = run_cli(home.path(), &["retrain"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("history cannot be empty"));
}
