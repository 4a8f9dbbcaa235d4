// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Basic CLI tests - help, version, and option validation
//!
//! None of these reach the network: validation runs before any connection
//! is configured.

// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(deprecated, clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn ndi_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ndi-pcv").expect("Failed to find ndi-pcv binary");
    cmd.env_remove("NDI_HOST")
        .env_remove("NDI_PROFILE")
        .env_remove("NDI_TOKEN")
        .env_remove("NDI_OUTPUT_LEVEL");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_version() {
    ndi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ndi-pcv"));
}

#[test]
fn test_help() {
    ndi_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--ig-name"))
        .stdout(predicate::str::contains("--state"));
}

#[test]
fn test_ig_name_is_required() {
    ndi_cmd()
        .args(["--state", "query"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ig-name"));
}

#[test]
fn test_invalid_state_rejected() {
    ndi_cmd()
        .args(["--ig-name", "IG1", "--state", "merged"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("merged"));
}

#[test]
fn test_file_and_manual_conflict() {
    ndi_cmd()
        .args([
            "--ig-name", "IG1", "--site", "siteA", "--name", "pcv1", "--state", "present",
            "--file", "changes.json", "--manual", "[]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_present_without_name_fails_with_json() {
    let output = ndi_cmd()
        .args(["--ig-name", "IG1", "--site", "siteA", "--state", "present", "--manual", "[]"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert_eq!(result["failed"], true);
    assert_eq!(result["changed"], false);
    assert!(result["msg"].as_str().unwrap().contains("name"));
}

#[test]
fn test_missing_file_names_path() {
    let output = ndi_cmd()
        .args([
            "--ig-name", "IG1", "--site", "siteA", "--name", "pcv1", "--state", "present",
            "--file", "/nonexistent/pcv/changes.json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert_eq!(
        result["msg"],
        "File not found: /nonexistent/pcv/changes.json"
    );
}

#[test]
fn test_bad_manual_json() {
    let output = ndi_cmd()
        .args([
            "--fab-name", "IG1", "--site", "siteA", "--name", "pcv1", "--state", "present",
            "--manual", "[{not json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert!(
        result["msg"]
            .as_str()
            .unwrap()
            .starts_with("manual is not valid JSON")
    );
}

#[test]
fn test_no_host_configured() {
    let config_dir = tempfile::tempdir().unwrap();
    ndi_cmd()
        .env("NDI_CONFIG_DIR", config_dir.path())
        .args(["--ig-name", "IG1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No NDI host configured"));
}
