//! CLI error handling tests for np-core.
//!
//! These tests verify that bad arguments, bad inputs and bad settings
//! produce the documented exit codes and error payloads.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Get a Command for the np-core binary, isolated from the caller's config.
fn np_core(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("np-core").expect("np-core binary should exist");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("NP_SETTINGS")
        .env_remove("NP_CONFIG_DIR")
        .env_remove("NP_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Last JSON document on stderr (log lines may precede it).
fn stderr_error(cmd: &mut Command) -> (i32, Value) {
    let output = cmd.output().expect("np-core should run");
    let stderr = String::from_utf8(output.stderr).unwrap();
    let start = stderr.rfind("\n{\n").map(|i| i + 1).unwrap_or(0);
    let json = serde_json::from_str(&stderr[start..]).expect("stderr should end with JSON");
    (output.status.code().unwrap(), json)
}

fn write_settings(home: &TempDir, body: &str) -> String {
    let path = home.path().join("settings.json");
    std::fs::write(&path, body).unwrap();
    path.to_str().unwrap().to_string()
}

// ============================================================================
// Argument errors
// ============================================================================

mod arguments {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_config_subcommand_fails() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["config", "nonexistent"])
            .assert()
            .code(10);
    }

    #[test]
    fn null_without_alt_fails() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["analyze", "--null", "0.5,0.5"])
            .assert()
            .code(10);
    }

    #[test]
    fn problem_conflicts_with_demo() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["analyze", "--demo", "--problem", "p.json"])
            .assert()
            .code(10);
    }

    #[test]
    fn unknown_filter_fails() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["analyze", "--demo", "--only", "bogus"])
            .assert()
            .code(10);
    }

    #[test]
    fn unknown_schema_name() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["config", "schema", "Nope"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown schema"));
    }

    #[test]
    fn help_exits_clean() {
        let home = TempDir::new().unwrap();
        np_core(&home).arg("--help").assert().success();
    }
}

// ============================================================================
// Input errors
// ============================================================================

mod inputs {
    use super::*;

    #[test]
    fn missing_input_is_input_error() {
        let home = TempDir::new().unwrap();
        let (code, json) = stderr_error(np_core(&home).arg("analyze"));
        assert_eq!(code, 12);
        assert_eq!(json["code"], 22);
        assert_eq!(json["category"], "input");
    }

    #[test]
    fn length_mismatch_is_input_error() {
        let home = TempDir::new().unwrap();
        let (code, json) = stderr_error(np_core(&home).args([
            "analyze", "--null", "0.5,0.5", "--alt", "1.0",
        ]));
        assert_eq!(code, 12);
        assert_eq!(json["code"], 20);
        assert_eq!(json["context"]["null_len"], 2);
        assert_eq!(json["context"]["alt_len"], 1);
        assert!(json["context"]["run_id"].is_string());
    }

    #[test]
    fn bad_number_is_rejected() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["analyze", "--null", "0.5,abc", "--alt", "0.5,0.5"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("null[1]"));
    }

    #[test]
    fn strict_mode_rejects_bad_distribution() {
        let home = TempDir::new().unwrap();
        let settings = write_settings(&home, r#"{ "validation": { "mode": "strict" } }"#);
        let (code, json) = stderr_error(np_core(&home).args([
            "--settings",
            &settings,
            "analyze",
            "--null",
            "0.2,0.2",
            "--alt",
            "0.5,0.5",
        ]));
        assert_eq!(code, 12);
        assert_eq!(json["code"], 21);
    }

    #[test]
    fn human_errors_in_markdown_mode() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["-f", "md", "--no-color", "analyze", "--null", "0.5", "--alt", "0.5,0.5"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("Reason:"))
            .stderr(predicate::str::contains("Fix:"));
    }

    #[test]
    fn exitcode_mode_is_silent_on_error() {
        let home = TempDir::new().unwrap();
        np_core(&home)
            .args(["-f", "exitcode", "analyze", "--null", "0.5", "--alt", "0.5,0.5"])
            .assert()
            .code(12)
            .stdout(predicate::str::is_empty());
    }
}

// ============================================================================
// Limit and config errors
// ============================================================================

mod limits_and_config {
    use super::*;

    #[test]
    fn outcome_limit_from_settings() {
        let home = TempDir::new().unwrap();
        let settings = write_settings(&home, r#"{ "max_outcomes": 2 }"#);
        let (code, json) = stderr_error(np_core(&home).args([
            "--settings",
            &settings,
            "analyze",
            "--null",
            "0.2,0.3,0.5",
            "--alt",
            "0.5,0.3,0.2",
        ]));
        assert_eq!(code, 13);
        assert_eq!(json["code"], 30);
        assert_eq!(json["context"]["outcomes"], 3);
        assert_eq!(json["context"]["max"], 2);
    }

    #[test]
    fn invalid_settings_value() {
        let home = TempDir::new().unwrap();
        let settings = write_settings(&home, r#"{ "max_outcomes": 0 }"#);
        let (code, json) = stderr_error(np_core(&home).args([
            "--settings",
            &settings,
            "analyze",
            "--demo",
        ]));
        assert_eq!(code, 11);
        assert_eq!(json["code"], 11);
    }

    #[test]
    fn malformed_settings_json() {
        let home = TempDir::new().unwrap();
        let settings = write_settings(&home, "{ not json");
        np_core(&home)
            .args(["--settings", &settings, "analyze", "--demo"])
            .assert()
            .code(11);
    }

    #[test]
    fn config_validate_rejects_bad_tolerance() {
        let home = TempDir::new().unwrap();
        let settings = write_settings(&home, r#"{ "tie_tolerance": -1.0 }"#);
        np_core(&home)
            .args(["config", "validate", &settings])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("tie_tolerance"));
    }

    #[test]
    fn missing_settings_file_is_io_error() {
        let home = TempDir::new().unwrap();
        let missing = home.path().join("absent.json");
        np_core(&home)
            .args(["--settings", missing.to_str().unwrap(), "analyze", "--demo"])
            .assert()
            .code(21);
    }
}
