//! End-to-end tests for the lp-core binary.
//!
//! Each test runs the real binary against fixture models with the config
//! search path pointed at an empty temp directory, so results do not depend
//! on the host's `~/.config/lpbvi`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

/// Get a Command for the lp-core binary with an isolated config directory.
fn lp_core(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lp-core").expect("lp-core binary should exist");
    cmd.env_remove("LPBVI_CONFIG")
        .env_remove("RUST_LOG")
        .env("LPBVI_CONFIG_DIR", config_dir.path())
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env("HOME", config_dir.path());
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be JSON")
}

// ============================================================================
// solve
// ============================================================================

mod solve {
    use super::*;

    #[test]
    fn tiger_solves_to_policy_document() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir)
            .args(["solve", "--model", &fixture("tiger.json"), "--tolerance", "1.0"])
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

        let doc = stdout_json(&output.stdout);
        assert_eq!(doc["model"]["name"], "tiger");
        assert_eq!(doc["model"]["fingerprint"].as_str().unwrap().len(), 64);
        let vfs = doc["value_functions"].as_array().unwrap();
        assert_eq!(vfs.len(), 2);
        assert_eq!(vfs[0]["objective"], "treasure");
        assert_eq!(vfs[0]["priority"], 0);
        assert_eq!(vfs[1]["objective"], "quiet");
        assert_eq!(doc["belief_points"].as_array().unwrap().len(), 3);
        assert_eq!(doc["stats"]["expansion_rule"], "none");
    }

    #[test]
    fn expansion_grows_belief_points() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir)
            .args([
                "solve",
                "-m",
                &fixture("tiger.json"),
                "--tolerance",
                "1.0",
                "--expansion-rule",
                "ssea",
                "--expansions",
                "3",
                "--seed",
                "5",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        let doc = stdout_json(&output.stdout);
        assert!(doc["belief_points"].as_array().unwrap().len() > 3);
        assert_eq!(doc["stats"]["rounds"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn output_file_is_written() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("policy.json");
        lp_core(&dir)
            .args(["solve", "-m", &fixture("two_action.json"), "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
        let text = std::fs::read_to_string(&out).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["value_functions"][0]["objective"], "payout");
    }

    #[test]
    fn summary_format_is_one_line() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["-f", "summary", "solve", "-m", &fixture("two_action.json")])
            .assert()
            .success()
            .stdout(predicate::str::contains("two-action"));
    }

    #[test]
    fn markdown_format_has_heading() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["-f", "md", "solve", "-m", &fixture("two_action.json")])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("#"));
    }

    #[test]
    fn config_file_is_honored() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir)
            .args(["--config", &fixture("solver_gentle.json")])
            .args(["solve", "-m", &fixture("tiger.json")])
            .output()
            .unwrap();
        assert!(output.status.success());
        let doc = stdout_json(&output.stdout);
        assert_eq!(doc["config"]["summary"]["expansion_rule"], "ssea");
        assert_eq!(doc["stats"]["rounds"].as_array().unwrap().len(), 2);
    }
}

// ============================================================================
// check
// ============================================================================

mod check {
    use super::*;

    #[test]
    fn reports_sweeps_per_objective() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir)
            .args(["check", "-m", &fixture("tiger.json"), "--tolerance", "0.1"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report = stdout_json(&output.stdout);
        assert_eq!(report["status"], "ok");
        let objectives = report["objectives"].as_array().unwrap();
        assert_eq!(objectives.len(), 2);
        assert_eq!(objectives[0]["reward_min"], -100.0);
        assert_eq!(objectives[0]["reward_max"], 10.0);
        let sweeps = report["sweeps"].as_u64().unwrap();
        for objective in objectives {
            assert!(objective["sweeps_required"].as_u64().unwrap() <= sweeps);
        }
    }

    #[test]
    fn slack_mismatch_is_config_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["check", "-m", &fixture("tiger.json"), "--slack", "0.5"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("slack"));
    }
}

// ============================================================================
// Error exit codes
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn missing_component_exits_with_model_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["solve", "-m", &fixture("missing_transitions.json")])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("transitions"));
    }

    #[test]
    fn scalar_rewards_exit_with_model_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["solve", "-m", &fixture("scalar_rewards.json")])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("reward"));
    }

    #[test]
    fn finite_horizon_exits_with_config_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["solve", "-m", &fixture("tiger_finite_horizon.json")])
            .assert()
            .code(12)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("horizon"));
    }

    #[test]
    fn undiscounted_finite_horizon_exits_with_config_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["check", "-m", &fixture("tiger_finite_undiscounted.json")])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("horizon"));
    }

    #[test]
    fn unknown_expansion_rule_exits_with_config_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args([
                "solve",
                "-m",
                &fixture("tiger.json"),
                "--expansion-rule",
                "breadth-first",
            ])
            .assert()
            .code(12);
    }

    #[test]
    fn missing_model_file_exits_with_io_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["solve", "-m", "/nonexistent/model.json"])
            .assert()
            .code(21);
    }

    #[test]
    fn missing_config_file_is_config_or_io_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["--config", "/nonexistent/solver.json"])
            .args(["solve", "-m", &fixture("tiger.json")])
            .assert()
            .failure()
            .stderr(predicate::str::contains("solver.json"));
    }

    #[test]
    fn unknown_command_fails() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn solve_requires_model() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .arg("solve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--model"));
    }
}

// ============================================================================
// config
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn show_reports_builtin_default() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir).args(["config", "show"]).output().unwrap();
        assert!(output.status.success());
        let shown = stdout_json(&output.stdout);
        assert_eq!(shown["config"]["tolerance"], 0.01);
        assert!(shown["path"].is_null());
    }

    #[test]
    fn config_dir_file_is_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("solver.json"),
            r#"{"tolerance": 0.25, "max_expansions": 3}"#,
        )
        .unwrap();
        let output = lp_core(&dir).args(["config", "show"]).output().unwrap();
        assert!(output.status.success());
        let shown = stdout_json(&output.stdout);
        assert_eq!(shown["config"]["tolerance"], 0.25);
        assert_eq!(shown["config"]["max_expansions"], 3);
    }

    #[test]
    fn validate_accepts_good_file() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["config", "validate", &fixture("solver_gentle.json")])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"ok\""));
    }

    #[test]
    fn validate_rejects_bad_tolerance() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"tolerance": -1.0}"#).unwrap();
        lp_core(&dir)
            .args(["config", "validate"])
            .arg(&bad)
            .assert()
            .code(12)
            .stdout(predicate::str::contains("tolerance"));
    }

    #[test]
    fn presets_are_listed() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir).args(["config", "presets"]).output().unwrap();
        assert!(output.status.success());
        let presets = stdout_json(&output.stdout);
        let names: Vec<&str> = presets
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["quick", "balanced", "thorough"]);
    }
}

// ============================================================================
// schema and version
// ============================================================================

mod schema {
    use super::*;

    #[test]
    fn list_names_model_document() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["schema", "--list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ModelDocument"))
            .stdout(predicate::str::contains("PolicyDocument"));
    }

    #[test]
    fn model_document_schema_is_json() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir)
            .args(["schema", "ModelDocument"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let schema = stdout_json(&output.stdout);
        assert!(schema["properties"]["transitions"].is_object());
    }

    #[test]
    fn unknown_schema_is_args_error() {
        let dir = TempDir::new().unwrap();
        lp_core(&dir)
            .args(["schema", "Nope"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown schema type"));
    }

    #[test]
    fn version_reports_package_version() {
        let dir = TempDir::new().unwrap();
        let output = lp_core(&dir).arg("version").output().unwrap();
        assert!(output.status.success());
        let info = stdout_json(&output.stdout);
        assert_eq!(info["lp_core_version"], env!("CARGO_PKG_VERSION"));
    }
}
