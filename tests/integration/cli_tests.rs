//! Command-line behaviour: arguments, exit codes and the output file

use crate::common::*;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::{MockServer, ResponseTemplate};

const FAST_CONFIG: &str = r#"
[scraper]
request-delay-ms = 0
timeout-secs = 5
connect-timeout-secs = 5
"#;

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("volby.toml");
    std::fs::write(&path, FAST_CONFIG).unwrap();
    path
}

async fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_volby-scraper"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_cli_writes_csv_and_summary() {
    let server = MockServer::start().await;
    mount_alpha_beta(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("prostejov.csv");
    let url = listing_url(&server);

    let result = run_cli(&[
        &url,
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .await;

    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED_CSV);

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Municipalities: 2"));
    assert!(stdout.contains("Party columns: 3"));
}

#[tokio::test]
async fn test_cli_quiet_prints_no_summary() {
    let server = MockServer::start().await;
    mount_alpha_beta(&server).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("prostejov.csv");
    let url = listing_url(&server);

    let result = run_cli(&[
        "-q",
        "-c",
        config.to_str().unwrap(),
        &url,
        output.to_str().unwrap(),
    ])
    .await;

    assert!(result.status.success());
    assert!(result.stdout.is_empty());
    assert!(output.exists());
}

#[tokio::test]
async fn test_cli_detail_failure_exits_with_fetch_code() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(&server, "500011", html_response(DETAIL_ALPHA), 1).await;
    mount_detail(&server, "500020", ResponseTemplate::new(500), 1).await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("prostejov.csv");
    let url = listing_url(&server);

    let result = run_cli(&[
        &url,
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .await;

    assert_eq!(result.status.code(), Some(3));
    assert!(!output.exists());
    assert!(String::from_utf8_lossy(&result.stderr).contains("500"));
}

#[tokio::test]
async fn test_cli_invalid_url_exits_with_argument_code() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = run_cli(&["ftp://www.volby.cz/ps32", output.to_str().unwrap()]).await;

    assert_eq!(result.status.code(), Some(2));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_cli_invalid_config_exits_with_argument_code() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[scraper]\ntimeout-secs = 0\n").unwrap();
    let output = dir.path().join("out.csv");

    let result = run_cli(&[
        "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103",
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .await;

    assert_eq!(result.status.code(), Some(2));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_cli_missing_arguments_is_usage_error() {
    let result = run_cli(&[]).await;

    // clap reports usage errors with exit code 2
    assert_eq!(result.status.code(), Some(2));
    assert!(!result.stderr.is_empty());
}
