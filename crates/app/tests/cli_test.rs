//! End-to-end checks of the `vcd` binary that need no server.
#![allow(clippy::unwrap_used, missing_docs)]

use std::process::{Command, Output};

use tempfile::TempDir;

fn vcd(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vcd"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("VCD_SESSION_TOKEN")
        .env_remove("VCD_JWT")
        .env_remove("VCD_SESSIONS_FILE")
        .env("RUST_LOG", "error")
        .output()
        .unwrap()
}

#[test]
fn test_missing_credentials_fail_before_any_request() {
    let dir = TempDir::new().unwrap();

    let output = vcd(
        &dir,
        &["invoke", "https://vcd.invalid/api/org/1", "--api-version", "34.0"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no session"), "stderr: {stderr}");
}

#[test]
fn test_body_without_content_type_is_a_usage_error() {
    let dir = TempDir::new().unwrap();

    let output = vcd(
        &dir,
        &["invoke", "https://vcd.invalid/api/org/1", "--body", "<Foo/>"],
    );

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("vcd.toml"), "api_timeout_secs = \"soon\"\n").unwrap();

    let output = vcd(
        &dir,
        &["invoke", "https://vcd.invalid/api/org/1", "--session-token", "tok-1"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();

    let output = vcd(&dir, &["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("vcd "));
}
