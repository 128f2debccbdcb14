//! CLI integration tests

use std::process::{Command, Output};

fn run_fg(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "guardian-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_fg(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("FinOps Guardian"), "Should show app name");
    for command in [
        "analyze", "zombies", "rightsize", "explain", "remediate", "report", "generate",
    ] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_fg(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("fg"), "Should show binary name");
}

#[test]
fn test_analyze_help() {
    let output = run_fg(&["analyze", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--days"), "Should show days option");
    assert!(stdout.contains("--spike"), "Should show spike option");
}

#[test]
fn test_explain_help() {
    let output = run_fg(&["explain", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("root cause"));
}

#[test]
fn test_remediate_help() {
    let output = run_fg(&["remediate", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--reset"), "Should show reset option");
}

#[test]
fn test_report_help() {
    let output = run_fg(&["report", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--days"));
}

#[test]
fn test_generate_help() {
    let output = run_fg(&["generate", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--output"), "Should show output option");
    assert!(stdout.contains("cloud_bills.csv"), "Should show default path");
}

/// Generation works offline
#[test]
fn test_generate_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bills.csv");
    let path_str = path.to_str().unwrap();

    let output = run_fg(&["generate", "--days", "15", "--spike", "800", "--output", path_str]);

    assert!(output.status.success(), "generate should succeed offline");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 16);
    assert!(content.lines().last().unwrap().contains(",800,"));
}

#[test]
fn test_format_option() {
    let output = run_fg(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
}

#[test]
fn test_api_url_option() {
    let output = run_fg(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("FG_API_URL"), "Should show env var");
}

#[test]
fn test_invalid_command() {
    let output = run_fg(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_unreachable_server_fails() {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "guardian-cli", "--"])
        .args(["--api-url", "http://127.0.0.1:1", "zombies"])
        .env("HOME", tempfile::tempdir().unwrap().path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Should fail without a server");
}
