//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("--no-seed"));
}

#[test]
fn test_ingest_help() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("ingest").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Subreddit to import from"));
}

#[test]
fn test_ingest_requires_subreddit() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("ingest");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--subreddit"));
}

#[test]
fn test_seed_help() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("seed").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("collective").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("collective"));
}
