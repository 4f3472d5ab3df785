//! End-to-end CLI tests.
//!
//! These exercise argument parsing, config handling, discovery, and the
//! offline commands. Anything needing a live completion server is
//! covered by unit tests against the stub client instead.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use tempfile::TempDir;

fn distill() -> Command {
    Command::cargo_bin("distill").expect("binary builds")
}

/// Minimal completion-server stand-in: answers `/api/tags` with the
/// default model and any other request with a two-fragment NDJSON chat
/// stream. One request per connection; responses carry
/// `Connection: close` so the client reconnects each time.
fn serve_completion_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).is_err() {
                    break;
                }
                let line = line.trim_end().to_ascii_lowercase();
                if line.is_empty() {
                    break;
                }
                if let Some(value) = line.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);

            let payload = if request_line.starts_with("GET /api/tags") {
                r#"{"models":[{"name":"gemma3:12b"}]}"#.to_string()
            } else {
                "{\"message\":{\"content\":\"stub \"}}\n{\"message\":{\"content\":\"summary\"},\"done\":true}\n"
                    .to_string()
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            let mut stream = reader.into_inner();
            let _ = stream.write_all(response.as_bytes());
        }
    });

    base_url
}

// Port 9 (discard) refuses connections immediately on loopback.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn test_help_lists_subcommands() {
    distill()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_version_flag() {
    distill()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("distill"));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    distill().assert().failure();
}

#[test]
fn test_config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distill.toml"));
    assert!(dir.path().join("distill.toml").exists());
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("distill.toml"), "[server]\n").unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_show_reflects_file_and_flags() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("distill.toml"),
        "[server]\nmodel = \"from-file\"\n",
    )
    .unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["--model", "from-flag", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model       = from-flag"));
}

#[test]
fn test_env_overrides_file_but_not_flags() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("distill.toml"),
        "[server]\nmodel = \"from-file\"\n",
    )
    .unwrap();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .env("DISTILL_MODEL", "from-env")
        .env("DISTILL_BASE_URL", "http://env-host:1")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model       = from-env"))
        .stdout(predicate::str::contains("base_url    = http://env-host:1"));

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .env("DISTILL_MODEL", "from-env")
        .args(["--model", "from-flag", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model       = from-flag"));
}

#[test]
fn test_config_validate_rejects_malformed_toml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("distill.toml"), "not [valid").unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn test_config_validate_accepts_good_config() {
    let dir = TempDir::new().unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_status_reports_unreachable_server_and_pending_docs() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.txt"), "a document").unwrap();
    std::fs::write(dir.path().join("two.txt"), "another").unwrap();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["--base-url", UNREACHABLE, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unreachable"))
        .stdout(predicate::str::contains("pending:    2"));
}

#[test]
fn test_run_fails_fast_when_server_unreachable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("doc.txt"), "text").unwrap();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["--base-url", UNREACHABLE, "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreachable"));
}

#[test]
fn test_run_writes_summary_end_to_end() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("doc.txt"), "a short document to summarize").unwrap();
    let base_url = serve_completion_stub();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .env_remove("DISTILL_MODEL")
        .args(["--base-url", &base_url, "run"])
        .assert()
        .success();

    let summary = dir.path().join("summaries/doc_summary.txt");
    assert_eq!(std::fs::read_to_string(&summary).unwrap(), "stub summary");
}

#[test]
fn test_unwritable_sink_skips_document_not_batch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("doc.txt"), "a short document").unwrap();
    // A regular file where the output dir belongs makes every summary
    // write fail; the batch must still complete successfully.
    std::fs::write(dir.path().join("summaries"), "not a directory").unwrap();
    let base_url = serve_completion_stub();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .env_remove("DISTILL_MODEL")
        .args(["--base-url", &base_url, "run"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("summaries")).unwrap(),
        "not a directory"
    );
}

#[test]
fn test_models_fails_when_server_unreachable() {
    let dir = TempDir::new().unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["--base-url", UNREACHABLE, "models"])
        .assert()
        .failure();
}

#[test]
fn test_summarize_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .args(["--base-url", UNREACHABLE, "summarize", "ghost.txt"])
        .assert()
        .failure();
}

#[test]
fn test_clean_sanitizes_summaries_in_place() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("summaries");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("report_summary.txt"), "## Title\n*text* here").unwrap();

    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rewritten"));

    assert_eq!(
        std::fs::read_to_string(out.join("report_summary.txt")).unwrap(),
        " Title\ntext here"
    );
}

#[test]
fn test_clean_on_empty_project() {
    let dir = TempDir::new().unwrap();
    distill()
        .args(["--project-dir"])
        .arg(dir.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 summaries scanned"));
}
