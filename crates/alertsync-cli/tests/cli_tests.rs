//! Black-box tests for the alertsync binary
//!
//! Only paths that fail before any HTTP request is issued are exercised
//! here; everything behind the collaborator trait is covered by the engine
//! and integration suites.

use assert_cmd::Command;
use predicates::prelude::*;

fn alertsync() -> Command {
    let mut cmd = Command::cargo_bin("alertsync").unwrap();
    cmd.env_remove("MERAKI_API_KEY");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    alertsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list-orgs"))
        .stdout(predicate::str::contains("list-networks"));
}

#[test]
fn test_missing_api_key_is_a_clear_error() {
    alertsync()
        .arg("list-orgs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MERAKI_API_KEY"));
}

#[test]
fn test_run_requires_config_flag() {
    alertsync()
        .env("MERAKI_API_KEY", "test-key")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn test_run_with_missing_config_file_fails_before_any_request() {
    alertsync()
        .env("MERAKI_API_KEY", "test-key")
        .args(["run", "--config", "/nonexistent/alerts.json", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_run_rejects_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alerts.json");
    std::fs::write(&path, r#"{"organizations": []}"#).unwrap();

    alertsync()
        .env("MERAKI_API_KEY", "test-key")
        .args(["run", "--config"])
        .arg(&path)
        .arg("--yes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("declares no organizations"));
}

#[test]
fn test_all_networks_conflicts_with_network() {
    alertsync()
        .env("MERAKI_API_KEY", "test-key")
        .args([
            "run",
            "--config",
            "alerts.json",
            "--all-networks",
            "--network",
            "Branch-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
