//! Integration tests for the tasklist CLI.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the tasklist binary
#[allow(deprecated)]
fn tasklist_cmd() -> Command {
    Command::cargo_bin("tasklist").unwrap()
}

#[test]
fn test_help_command() {
    tasklist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tasklist CLI"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
fn test_version_flag() {
    tasklist_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_migrate_help() {
    tasklist_cmd()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--migrations-dir"))
        .stdout(predicate::str::contains("--url"));
}

#[test]
fn test_status_help() {
    tasklist_cmd()
        .args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied/pending"));
}

#[test]
fn test_setup_help() {
    tasklist_cmd()
        .args(["setup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline schema"));
}

#[test]
fn test_invalid_command() {
    tasklist_cmd()
        .arg("not_a_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_migrate_invalid_url_is_config_error() {
    tasklist_cmd()
        .args(["migrate", "--url", "postgres://localhost/tasks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_migrate_unreachable_server_exits_cleanly() {
    // Connection failure is explained, not raised: exit code 0.
    tasklist_cmd()
        .args(["migrate", "--url", "mysql://root@127.0.0.1:1/tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database connection failed"));
}

#[test]
fn test_setup_unreachable_server_exits_cleanly() {
    tasklist_cmd()
        .args(["setup", "--url", "mysql://root@127.0.0.1:1/tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema assurance skipped"));
}
