//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text. Nothing here touches the network.

#![allow(deprecated)] // cargo_bin deprecation; replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `flixscrape` binary.
fn flixscrape() -> Command {
    Command::cargo_bin("flixscrape").expect("binary 'flixscrape' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    flixscrape()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: flixscrape"))
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("seasons"))
        .stdout(predicate::str::contains("servers"))
        .stdout(predicate::str::contains("source"))
        .stdout(predicate::str::contains("filters"));
}

#[test]
fn version_flag_shows_semver() {
    flixscrape()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^flixscrape \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    flixscrape()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: flixscrape"));
}

#[test]
fn invalid_subcommand_fails() {
    flixscrape()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn search_help() {
    flixscrape()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Search titles"))
        .stdout(predicate::str::contains("<QUERY>"));
}

#[test]
fn servers_help() {
    flixscrape()
        .args(["servers", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<CONTENT_ID>"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn source_help() {
    flixscrape()
        .args(["source", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve a server id"))
        .stdout(predicate::str::contains("<SERVER_ID>"));
}

#[test]
fn filter_requires_kind_and_value() {
    flixscrape()
        .args(["filter", "genre"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<VALUE>"));
}

#[test]
fn servers_rejects_unknown_media_type() {
    flixscrape()
        .args(["servers", "123", "--type", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown media type"));
}
