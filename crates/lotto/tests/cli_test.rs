//! Integration tests for the `lotto` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without
//! a server; the end-to-end cases drive the binary against wiremock.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `lotto` with every `LOTTO_*` variable cleared and the config file
/// pointed at a path that does not exist.
fn lotto_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lotto");
    cmd.env("LOTTO_CONFIG", "/tmp/lotto-cli-test-nonexistent/config.toml")
        .env("HOME", "/tmp/lotto-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lotto-cli-test-nonexistent")
        .env_remove("LOTTO_PROFILE")
        .env_remove("LOTTO_API_URL")
        .env_remove("LOTTO_LOGIN_PHONE")
        .env_remove("LOTTO_PASSWORD")
        .env_remove("LOTTO_OUTPUT")
        .env_remove("LOTTO_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const TWO_PROFILES: &str = r#"
default_profile = "shop"

[profiles.home]
api_url = "http://127.0.0.1:9/api"
phone = "0123456789"
password = "hunter22"

[profiles.shop]
api_url = "http://127.0.0.1:9/api"
phone = "0198765432"
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lotto_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lotto_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("bid")
            .and(predicate::str::contains("slots"))
            .and(predicate::str::contains("results"))
            .and(predicate::str::contains("wallet")),
    );
}

#[test]
fn test_version_flag() {
    lotto_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lotto"));
}

#[test]
fn test_bid_help_lists_products() {
    lotto_cmd().args(["bid", "--help"]).assert().success().stdout(
        predicate::str::contains("ld")
            .and(predicate::str::contains("jp"))
            .and(predicate::str::contains("interactive")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    lotto_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    lotto_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    lotto_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = lotto_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    lotto_cmd()
        .args(["--output", "xml", "slots", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_jackpot_needs_six_numbers() {
    lotto_cmd()
        .args([
            "bid", "jp", "--name", "Ravi", "--phone", "0112223333", "-n", "1", "2", "3", "4", "5",
        ])
        .assert()
        .failure()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_platform_command_without_config() {
    let output = lotto_cmd().args(["slots", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("config"), "Expected a config hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    let file = config_file(TWO_PROFILES);
    lotto_cmd()
        .env("LOTTO_CONFIG", file.path())
        .args(["-p", "office", "wallet", "balance"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("office"));
}

#[test]
fn test_config_show_without_file() {
    lotto_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_show_masks_passwords() {
    let file = config_file(TWO_PROFILES);
    lotto_cmd()
        .env("LOTTO_CONFIG", file.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter22").not())
        .stdout(predicate::str::contains("0123456789"));
}

#[test]
fn test_config_profiles_marks_default() {
    let file = config_file(TWO_PROFILES);
    lotto_cmd()
        .env("LOTTO_CONFIG", file.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home\nshop *"));
}

#[test]
fn test_config_use_switches_default() {
    let file = config_file(TWO_PROFILES);
    lotto_cmd()
        .env("LOTTO_CONFIG", file.path())
        .args(["config", "use", "home"])
        .assert()
        .success();
    let saved = std::fs::read_to_string(file.path()).unwrap();
    assert!(saved.contains("default_profile = \"home\""), "{saved}");
}

// ── End to end ──────────────────────────────────────────────────────

async fn signed_in_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=abc; Path=/; HttpOnly")
                .set_body_json(json!({
                    "deviceId": "dev-1",
                    "user": {
                        "id": "u-1",
                        "role": "AGENT",
                        "firstName": "Aisyah",
                        "lastName": "Rahman",
                        "phone": "0123456789",
                        "isApproved": true
                    }
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let api_url = format!("{}/api", server.uri());
    let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
    tokio::task::spawn_blocking(move || {
        lotto_cmd()
            .env("LOTTO_PASSWORD", "hunter22")
            .args(["--api-url", &api_url, "--login-phone", "0123456789"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wallet_balance_as_json() {
    let server = signed_in_server().await;
    Mock::given(method("GET"))
        .and(path("/api/wallet/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBalance": "250.00",
            "availableBalance": "200.00",
            "commissionEarned": "12.50",
            "reservedWinning": "37.50"
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json-compact", "wallet", "balance"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["availableBalance"], json!(200.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_result_exits_not_found() {
    let server = signed_in_server().await;
    Mock::given(method("GET"))
        .and(path("/api/results/slot-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Result not found",
            "statusCode": 404
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["results", "get", "slot-404"]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials",
            "statusCode": 401
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["profile", "show"]).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}
