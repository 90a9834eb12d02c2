use crate::common::cmd;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("smap-resolve"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_lists_subcommands() {
    let assert = cmd().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for sub in ["resolve", "trace", "batch", "inspect", "source", "completions"] {
        assert!(stdout.contains(sub), "help is missing {}", sub);
    }
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("smap-resolve"));
}

#[test]
fn test_no_subcommand_fails() {
    cmd().assert().failure();
}
