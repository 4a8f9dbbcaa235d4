// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! End-to-end CLI runs against a stub NDI server
//!
//! The stub serves one insights group (`IG1`) with one site (`siteA`) and a
//! single finished analysis `pcv1`.

// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(deprecated, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const ROOT: &str = "/sedgeapi/v1/cisco-nir/api/api/telemetry/v2";
const SITE_UUID: &str = "2b1c5d8e-7f0a-4e4b-8d1e-000000000001";

/// Bodies of every delete request the stub received
type Deletes = Arc<Mutex<Vec<Value>>>;

struct Stub {
    host: String,
    deletes: Deletes,
    // Keeps the server alive for the duration of the test
    _runtime: tokio::runtime::Runtime,
}

fn start_stub() -> Stub {
    let deletes: Deletes = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            &format!("{}/config/insightsGroup", ROOT),
            get(|| async {
                axum::Json(json!({"value": {"data": [
                    {"name": "IG1", "assuranceEntities": [{"name": "siteA", "uuid": SITE_UUID}]}
                ]}}))
            }),
        )
        .route(
            &format!("{}/config/insightsGroup/IG1/prechangeAnalysis", ROOT),
            get(|| async {
                axum::Json(json!({"value": {"data": [
                    {"jobId": "job-1", "name": "pcv1", "fabricUuid": SITE_UUID}
                ]}}))
            }),
        )
        .route(
            &format!(
                "{}/epochDelta/insightsGroup/IG1/fabric/siteA/job/job-1/health/view/eventSeverity",
                ROOT
            ),
            get(|| async {
                axum::Json(json!({"value": {"data": [{"bucket": "MAJOR", "count": 1}]}}))
            }),
        )
        .route(
            &format!("{}/config/insightsGroup/IG1/prechangeAnalysis/jobs", ROOT),
            post(|State(deletes): State<Deletes>, body: String| async move {
                deletes
                    .lock()
                    .unwrap()
                    .push(serde_json::from_str(&body).unwrap_or(Value::Null));
                axum::Json(json!({}))
            }),
        )
        .with_state(deletes.clone());

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    runtime.spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        host: format!("http://{}", addr),
        deletes,
        _runtime: runtime,
    }
}

fn ndi_cmd(stub: &Stub) -> Command {
    let mut cmd = Command::cargo_bin("ndi-pcv").expect("Failed to find ndi-pcv binary");
    cmd.env_remove("NDI_PROFILE")
        .env_remove("NDI_OUTPUT_LEVEL")
        .env("NDI_HOST", &stub.host)
        .env("NDI_TOKEN", "test-token");
    cmd
}

fn run_json(cmd: &mut Command) -> (Value, bool) {
    let output = cmd.output().expect("Failed to execute ndi-pcv");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}):\n{}\nstderr:\n{}", e, stdout, stderr));
    (value, output.status.success())
}

#[test]
fn test_query_named_job() {
    let stub = start_stub();
    let (result, ok) = run_json(ndi_cmd(&stub).args([
        "--ig-name", "IG1", "--site-name", "siteA", "--name", "pcv1",
    ]));

    assert!(ok);
    assert_eq!(result["changed"], false);
    assert_eq!(
        result["current"],
        json!({"value": {"data": [{"bucket": "MAJOR", "count": 1}]}})
    );
    assert!(result.get("method").is_none());
}

#[test]
fn test_query_debug_output() {
    let stub = start_stub();
    let (result, ok) = run_json(ndi_cmd(&stub).args([
        "--ig-name", "IG1", "--site", "siteA", "--name", "pcv1", "--output-level", "debug",
    ]));

    assert!(ok);
    assert_eq!(result["method"], "GET");
    assert_eq!(result["status"], 200);
    assert!(
        result["url"]
            .as_str()
            .unwrap()
            .ends_with("/job/job-1/health/view/eventSeverity")
    );
}

#[test]
fn test_absent_check_mode_does_not_delete() {
    let stub = start_stub();
    let (result, ok) = run_json(ndi_cmd(&stub).args([
        "--ig-name", "IG1", "--site", "siteA", "--name", "pcv1", "--state", "absent", "--check",
    ]));

    assert!(ok);
    assert_eq!(result["changed"], true);
    assert_eq!(result["current"], json!({}));
    assert!(stub.deletes.lock().unwrap().is_empty());
}

#[test]
fn test_absent_deletes_job() {
    let stub = start_stub();
    let (result, ok) = run_json(ndi_cmd(&stub).args([
        "--ig-name", "IG1", "--site", "siteA", "--name", "pcv1", "--state", "absent",
        "--output-level", "info",
    ]));

    assert!(ok);
    assert_eq!(result["changed"], true);
    assert_eq!(result["previous"]["jobId"], "job-1");
    assert_eq!(
        *stub.deletes.lock().unwrap(),
        vec![json!([{"jobId": "job-1"}])]
    );
}

#[test]
fn test_unknown_site_fails() {
    let stub = start_stub();
    let output = ndi_cmd(&stub)
        .args(["--ig-name", "IG1", "--site", "siteZ", "--name", "pcv1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["failed"], true);
    assert_eq!(
        result["msg"],
        "Site 'siteZ' not found in insights group 'IG1'"
    );
}
