//! Integration tests for the `abflow` CLI binary.
//!
//! Argument parsing, configuration errors and a few end-to-end runs against
//! a wiremock BusinessFlow appliance.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `abflow` binary with env isolation.
///
/// Clears all `ABFLOW_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn abflow_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("abflow");
    cmd.env("HOME", "/tmp/abflow-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/abflow-cli-test-nonexistent")
        .env("ABFLOW_CONFIG", config)
        .env_remove("ABFLOW_PROFILE")
        .env_remove("ABFLOW_CREDENTIALS_FILE")
        .env_remove("ABFLOW_OUTPUT")
        .env_remove("ABFLOW_INSECURE")
        .env_remove("ABFLOW_TIMEOUT")
        .env_remove("ABFLOW_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn missing_config() -> PathBuf {
    PathBuf::from("/tmp/abflow-cli-test-nonexistent/config.toml")
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Write a device credentials file pointing at `server` over plain HTTP.
fn credentials_for(dir: &Path, server: &MockServer, managed: &[&str]) -> PathBuf {
    let addr = server.address();
    let file = dir.join("device.json");
    std::fs::write(
        &file,
        json!({
            "host": addr.ip().to_string(),
            "port": addr.port().to_string(),
            "user": "admin",
            "password": "secret",
            "ssl_enabled": false,
            "managed_applications": managed,
        })
        .to_string(),
    )
    .unwrap();
    file
}

async fn appliance() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/BusinessFlow/rest/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/BusinessFlow/rest/v1/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/BusinessFlow/rest/v1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "payroll", "revisionID": 11, "revisionStatus": "Draft" },
            { "name": "billing", "revisionID": 12, "revisionStatus": "Draft" },
            { "name": "legacy", "revisionID": 13, "revisionStatus": "Active" },
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = abflow_cmd(&missing_config()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    abflow_cmd(&missing_config())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("BusinessFlow")
                .and(predicate::str::contains("applications"))
                .and(predicate::str::contains("flows"))
                .and(predicate::str::contains("drafts")),
        );
}

#[test]
fn test_version_flag() {
    abflow_cmd(&missing_config())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("abflow"));
}

#[test]
fn test_completions_zsh() {
    abflow_cmd(&missing_config())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_honors_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("abflow.toml");
    abflow_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abflow.toml"));
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[profiles.prod]\nhost = \"algosec.example.com\"\nuser = \"admin\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    abflow_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.prod]")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_no_device_configured() {
    let output = abflow_cmd(&missing_config())
        .args(["applications", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No device configured"), "{text}");
}

#[test]
fn test_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[profiles.prod]\nhost = \"h\"\nuser = \"u\"\n").unwrap();

    let output = abflow_cmd(&config)
        .args(["--profile", "staging", "applications", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("Profile 'staging' not found"), "{text}");
}

#[test]
fn test_credentials_file_bad_port() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("device.json");
    std::fs::write(
        &file,
        r#"{"host": "h", "port": "44x", "user": "u", "password": "p"}"#,
    )
    .unwrap();

    let output = abflow_cmd(&missing_config())
        .args(["--credentials-file", file.to_str().unwrap(), "applications", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("The port attribute in the configuration is not an integer"),
        "{text}"
    );
}

// ── Against a mock appliance ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_applications_list_filters_unmanaged() {
    let server = appliance().await;
    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &["payroll", "legacy"]);

    abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["-o", "plain", "applications", "list"])
        .assert()
        .success()
        .stdout(predicate::eq("payroll\nlegacy\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_drafts_status_lists_managed_drafts() {
    let server = appliance().await;
    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &["payroll", "legacy"]);

    abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["-o", "plain", "drafts", "status"])
        .assert()
        .success()
        .stdout(predicate::eq("payroll\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unmanaged_create_is_refused() {
    let server = appliance().await;
    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &["payroll"]);

    let output = abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["applications", "create", "billing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    let text = combined_output(&output);
    assert!(
        text.contains("Creation cancelled for unmanaged application billing"),
        "{text}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_flow_create_rejects_bad_service_before_contacting_device() {
    let server = appliance().await;
    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &[]);

    let output = abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["flows", "create", "payroll/web"])
        .args(["--source", "10.0.0.1", "--destination", "10.0.0.2"])
        .args(["--service", "icmp/8"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("icmp/8"), "{text}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_flow_delete_in_unknown_application_is_not_found() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/BusinessFlow/rest/v1/applications/name/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &[]);

    let output = abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["--yes", "flows", "delete", "ghost/web"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("application 'ghost' not found"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_noop_reports_plan() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/BusinessFlow/rest/v1/applications/11/flows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let creds = credentials_for(dir.path(), &server, &["payroll", "hr-portal"]);
    let manifest = dir.path().join("desired.yaml");
    std::fs::write(
        &manifest,
        "applications:\n  - name: hr-portal\nflows:\n  - title: payroll/web\n    sources: [a]\n    destinations: [b]\n    services: [tcp/443]\napply_drafts: true\n",
    )
    .unwrap();

    abflow_cmd(&missing_config())
        .args(["--credentials-file", creds.to_str().unwrap()])
        .args(["-o", "plain", "apply", "--noop", "-f", manifest.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq(
            "create abf_application[hr-portal]\n\
             create abf_flow[payroll/web]\n\
             update abf_apply_draft[apply]\n",
        ));

    let mutations = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method != wiremock::http::Method::GET && !r.url.path().ends_with("/login"))
        .count();
    assert_eq!(mutations, 0, "noop run must not mutate");
}
