//! Integration tests for the `lookprov` binary.
//!
//! Local commands run without a server; connected commands run against a
//! wiremock instance. Config directories point at a temp dir so tests never
//! touch the user's real configuration.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

fn lookprov_cmd(home: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lookprov");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("LOOKPROV_PROFILE")
        .env_remove("LOOKPROV_BASE_URL")
        .env_remove("LOOKPROV_CLIENT_ID")
        .env_remove("LOOKPROV_CLIENT_SECRET")
        .env_remove("LOOKPROV_TOKEN")
        .env_remove("LOOKPROV_OUTPUT")
        .env_remove("LOOKPROV_INSECURE")
        .env_remove("LOOKPROV_TIMEOUT");
    cmd
}

fn desired_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

async fn mount_settings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/4.0/setting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "privatelabel_configuration": {
                "custom_welcome_email_advanced": false,
                "default_title": "Acme"
            },
            "custom_welcome_email": {
                "enabled": true,
                "content": "<p>hi</p>"
            },
            "embed_config": { "embed_enabled": false }
        })))
        .mount(server)
        .await;
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_help_lists_resource_commands() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("setting")
            .and(predicate::str::contains("folder"))
            .and(predicate::str::contains("model-set"))
            .and(predicate::str::contains("api-credential")),
    );
}

#[test]
fn test_no_args_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = lookprov_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_setting_schema_as_json() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args(["schema", "looker_setting", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("embed_config")
                .and(predicate::str::contains("\"write_only\": true")),
        );
}

#[test]
fn test_unknown_schema_type_is_not_found() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args(["schema", "looker_dashboard"])
        .assert()
        .code(4);
}

#[test]
fn test_connected_command_without_config_fails() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args(["folder", "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_config_init_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args([
            "--profile",
            "prod",
            "--base-url",
            "https://acme.looker.com:19999/api",
            "config",
            "init",
        ])
        .assert()
        .success();

    lookprov_cmd(&home)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* prod"));
}

// ── Connected commands ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_setting_plan_reports_changes_without_patching() {
    let server = MockServer::start().await;
    mount_settings(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let file = desired_file("timezone = \"Europe/Berlin\"\n");

    lookprov_cmd(&home)
        .args(["--base-url", &format!("{}/api", server.uri()), "--token", "t0k"])
        .args(["setting", "plan", "-o", "json"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Europe/Berlin"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setting_apply_violation_exits_with_usage_code() {
    let server = MockServer::start().await;
    mount_settings(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let file = desired_file("[custom_welcome_email]\nsubject = \"Welcome\"\n");

    lookprov_cmd(&home)
        .args(["--base-url", &format!("{}/api", server.uri()), "--token", "t0k"])
        .args(["setting", "apply"])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("custom_welcome_email.subject"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_folder_lookup_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "7", "name": "Finance", "parent_id": "1" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/folders/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "1", "name": "Shared" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    lookprov_cmd(&home)
        .args(["--base-url", &format!("{}/api", server.uri()), "--token", "t0k"])
        .args(["folder", "lookup", "--name", "Finance", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"parent_name\": \"Shared\""));
}

#[test]
fn test_folder_delete_without_yes_in_pipe_is_refused() {
    let home = tempfile::tempdir().unwrap();
    // The prompt check happens before any request is sent.
    lookprov_cmd(&home)
        .args(["--base-url", "http://127.0.0.1:9/api", "--token", "t0k"])
        .args(["folder", "delete", "7"])
        .write_stdin("")
        .assert()
        .code(2);
}
