//! Integration tests for the `folio` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! error exit codes, and read commands against a wiremock API.
#![allow(clippy::unwrap_used)]

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `folio` binary with env isolation.
///
/// Clears all `FOLIO_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn folio_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("folio");
    cmd.env("HOME", "/tmp/folio-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/folio-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("FOLIO_API_URL")
        .env_remove("FOLIO_OUTPUT")
        .env_remove("FOLIO_TIMEOUT")
        .env_remove("FOLIO_FALLBACK")
        .env_remove("FOLIO_USERNAME")
        .env_remove("FOLIO_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_folio(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || folio_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

/// An address nothing listens on.
const DEAD_API: &str = "http://127.0.0.1:9";

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = folio_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    folio_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("portfolio")
            .and(predicate::str::contains("projects"))
            .and(predicate::str::contains("certificates"))
            .and(predicate::str::contains("upload")),
    );
}

#[test]
fn test_version_flag() {
    folio_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    folio_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    folio_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file_prints_defaults() {
    folio_cmd()
        .args(["config", "show", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:5000"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = folio_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_category_is_rejected() {
    folio_cmd()
        .args(["projects", "list", "--category", "pottery"])
        .assert()
        .code(2);
}

#[test]
fn test_create_without_credentials_is_auth_error() {
    let output = folio_cmd()
        .args(["--api-url", DEAD_API, "projects", "create", "--title", "Thing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(
        text.contains("credentials"),
        "Expected credential hint:\n{text}"
    );
}

#[test]
fn test_unreachable_api_without_fallback_is_connection_error() {
    folio_cmd()
        .args(["--api-url", DEAD_API, "--no-fallback", "--timeout", "5"])
        .args(["projects", "list"])
        .assert()
        .code(7);
}

#[test]
fn test_unreachable_api_falls_back_to_placeholders() {
    folio_cmd()
        .args(["--api-url", DEAD_API, "--timeout", "5", "-o", "plain"])
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not())
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_delete_requires_yes_when_not_interactive() {
    folio_cmd()
        .args(["--api-url", DEAD_API, "projects", "delete", "abc"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_projects_list_renders_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "_id": "p1",
                "title": "Weather station",
                "slug": "weather-station",
                "category": "embedded",
                "difficulty": "hard",
                "techStack": ["C", "ESP32"]
            }],
            "pagination": { "page": 1, "limit": 10, "total": 1, "pages": 1 }
        })))
        .mount(&server)
        .await;

    let output = run_folio(args(&["--api-url", &server.uri(), "-o", "json", "projects", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["_id"], "p1");
    assert_eq!(parsed[0]["techStack"][1], "ESP32");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_project_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "success": false, "message": "Project not found" })),
        )
        .mount(&server)
        .await;

    run_folio(args(&["--api-url", &server.uri(), "--no-fallback", "projects", "get", "nope"]))
        .await
        .assert()
        .code(4)
        .stderr(predicate::str::contains("projects list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_without_session_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Not authenticated" })))
        .mount(&server)
        .await;

    run_folio(args(&["--api-url", &server.uri(), "auth", "whoami"]))
        .await
        .assert()
        .code(3)
        .stderr(predicate::str::contains("/admin/login"));
}
