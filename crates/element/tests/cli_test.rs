//! Integration tests for the `element` CLI binary.
//!
//! Argument parsing, help output, offline decoding, the config subcommand
//! and error exit codes, all without a live Element IoT account.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const SHT35_PAYLOAD: &str = "0254A60003783F596E0C17";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `element` binary with env isolation.
///
/// Clears all `ELEMENT_*` env vars and points config lookups at a
/// nonexistent path so tests never touch the user's real configuration.
fn element_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("element");
    cmd.env("HOME", "/tmp/element-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/element-cli-test-nonexistent")
        .env(
            "ELEMENT_CONFIG",
            "/tmp/element-cli-test-nonexistent/config.toml",
        )
        .env_remove("ELEMENT_PROFILE")
        .env_remove("ELEMENT_API_LOCATION")
        .env_remove("ELEMENT_API_KEY")
        .env_remove("ELEMENT_OUTPUT")
        .env_remove("ELEMENT_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = element_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    element_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Element IoT")
            .and(predicate::str::contains("readings"))
            .and(predicate::str::contains("packets"))
            .and(predicate::str::contains("resolve")),
    );
}

#[test]
fn test_version_flag() {
    element_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("element"));
}

#[test]
fn test_completions_bash() {
    element_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Offline decoding ────────────────────────────────────────────────

#[test]
fn test_decode_json() {
    element_cmd()
        .args(["decode", "sht35", SHT35_PAYLOAD, "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Device ID")
                .and(predicate::str::contains("21670"))
                .and(predicate::str::contains("Battery voltage")),
        );
}

#[test]
fn test_decode_table() {
    element_cmd()
        .args(["decode", "DL-SHT35", SHT35_PAYLOAD])
        .assert()
        .success()
        .stdout(predicate::str::contains("Field").and(predicate::str::contains("Air humidity")));
}

#[test]
fn test_decode_unknown_model_is_rejected() {
    let output = element_cmd()
        .args(["decode", "DL-NOPE", SHT35_PAYLOAD])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unsupported device model"));
}

#[test]
fn test_decode_version_mismatch_exits_with_decode_code() {
    let output = element_cmd()
        .args(["decode", "sht35", SHT35_PAYLOAD, "--expect-version", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
    assert!(combined_output(&output).contains("protocol version 2 doesn't match v1"));
}

#[test]
fn test_decode_invalid_hex() {
    let output = element_cmd()
        .args(["decode", "sht35", "zz"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_readings_with_device_and_folder() {
    let output = element_cmd()
        .args([
            "readings",
            "--device",
            "DEC0054B0",
            "--folder",
            "stadt-hamburg",
            "--api-key",
            "123456789ABCDEFG",
            "--api-location",
            "http://127.0.0.1:9/api/v1/",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("only one of device_name or folder must be specified"));
}

#[test]
fn test_packets_without_target() {
    let output = element_cmd().arg("packets").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("one of device_name or folder needs to be specified"));
}

#[test]
fn test_query_timeout_requires_stream() {
    let output = element_cmd()
        .args(["readings", "-d", "DEC0054B0", "--query-timeout", "10"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_api_key_is_auth_error() {
    let output = element_cmd().arg("folders").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No API key configured"));
}

#[test]
fn test_unknown_profile_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profiles.default]
api_key = "123456789ABCDEFG"
"#,
    )
    .unwrap();

    let output = element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["folders", "--profile", "staging"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Profile 'staging' not found"));
}

#[test]
fn test_unreachable_api_is_connection_error() {
    let output = element_cmd()
        .args([
            "folders",
            "--api-key",
            "123456789ABCDEFG",
            "--api-location",
            "http://127.0.0.1:9/api/v1/",
            "--timeout",
            "2",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(!combined_output(&output).contains("123456789ABCDEFG"));
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.default\napi_key = ").unwrap();

    let output = element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["folders", "--api-key", "123456789ABCDEFG"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("config loading failed"));
}

#[test]
fn test_config_default_output_applies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\noutput = \"json\"\n").unwrap();

    element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["decode", "sht35", SHT35_PAYLOAD])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"Device ID\"")
                .and(predicate::str::contains("Field").not()),
        );

    // An explicit flag wins over the config default.
    element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["decode", "sht35", SHT35_PAYLOAD, "-o", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Field"));
}

// ── Config subcommand ───────────────────────────────────────────────

fn write_profiles(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "default"

[profiles.default]
api_key = "123456789ABCDEFG"

[profiles.testing]
api_location = "https://testing.element-iot.com/api/v1/"
api_key_env = "ELEMENT_TESTING_KEY"
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_config_show_masks_api_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_profiles(&dir);

    element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.testing]")
                .and(predicate::str::contains("api_key = \"****\""))
                .and(predicate::str::contains("123456789ABCDEFG").not()),
        );
}

#[test]
fn test_config_use_sets_default_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_profiles(&dir);

    element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["config", "use", "testing"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("default_profile = \"testing\""), "saved config:\n{saved}");
    assert!(saved.contains("[profiles.default]"), "saved config:\n{saved}");

    element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["config", "profiles", "-o", "plain"])
        .assert()
        .success()
        .stdout("default\ntesting\n");
}

#[test]
fn test_config_use_unknown_profile_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_profiles(&dir);

    let output = element_cmd()
        .env("ELEMENT_CONFIG", &path)
        .args(["config", "use", "staging"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("default, testing"));

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("default_profile = \"default\""));
}
