// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Test helpers for ndi-client integration tests
//!
//! Provides a recording mock transport and canned NDI fixtures for an
//! insights group `IG1` with sites `siteA` and `siteB`.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use ndi_client::paths::{DEFAULT_API_ROOT, DEFAULT_API_VERSION};
use ndi_client::{Method, Transport, TransportError, TransportRequest, TransportResponse};
use serde_json::{Value, json};

pub const SITE_A_UUID: &str = "6f5a8f0e-1111-4c3b-9d59-aaaaaaaaaaaa";
pub const SITE_B_UUID: &str = "6f5a8f0e-2222-4c3b-9d59-bbbbbbbbbbbb";

/// Full URI path for an API-relative path
pub fn api(path: &str) -> String {
    format!("{}/{}/{}", DEFAULT_API_ROOT, DEFAULT_API_VERSION, path)
}

struct Route {
    method: Method,
    path: String,
    status: u16,
    body: Option<String>,
}

/// Transport that answers from a route table and records every request
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` (query string ignored) with `status` and JSON `body`.
    pub fn on(mut self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes.push(Route {
            method,
            path: api(path),
            status,
            body: Some(body.to_string()),
        });
        self
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<TransportRequest> {
        let full = api(path);
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path() == full)
            .collect()
    }

    /// Requests other than GETs
    pub fn writes(&self) -> Vec<TransportRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != Method::Get)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        let url = format!("https://nd.example.com{}", request.uri);
        match self
            .routes
            .iter()
            .find(|r| r.method == request.method && r.path == request.path())
        {
            Some(route) => Ok(TransportResponse {
                url,
                status: route.status,
                body: route.body.clone(),
                msg: format!("OK ({})", route.status),
                modified: None,
            }),
            None => Ok(TransportResponse {
                url,
                status: 404,
                body: Some(json!({"code": "404", "message": "no such route"}).to_string()),
                msg: "HTTP Error 404".to_string(),
                modified: None,
            }),
        }
    }
}

pub fn insights_groups() -> Value {
    json!({
        "value": {
            "data": [
                {
                    "name": "IG0",
                    "assuranceEntities": [
                        {"name": "siteA", "uuid": "00000000-0000-0000-0000-000000000000"}
                    ]
                },
                {
                    "name": "IG1",
                    "assuranceEntities": [
                        {"name": "siteA", "uuid": SITE_A_UUID, "type": "ACI"},
                        {"name": "siteB", "uuid": SITE_B_UUID, "type": "ACI"}
                    ]
                }
            ]
        }
    })
}

pub fn pcv_job(job_id: &str, name: &str, site_uuid: &str) -> Value {
    json!({
        "jobId": job_id,
        "name": name,
        "fabricUuid": site_uuid,
        "baseEpochId": "epoch-0",
        "analysisStatus": "COMPLETED",
        "analysisSubmissionTime": "2022-05-01T10:00:00Z"
    })
}

pub fn listing(items: Vec<Value>) -> Value {
    json!({"value": {"data": items}})
}

pub fn latest_epoch() -> Value {
    listing(vec![json!({
        "epochId": "epoch-42",
        "collectionTimeMsecs": 1651400000000i64,
        "fabricId": SITE_A_UUID,
        "epochType": "ONLINE"
    })])
}

pub fn event_severity(job_id: &str) -> Value {
    json!({
        "value": {
            "data": [
                {"bucket": "CRITICAL", "count": 0},
                {"bucket": "MAJOR", "count": 2},
                {"bucket": "MINOR", "count": 5}
            ],
            "jobId": job_id
        }
    })
}

/// Mock pre-loaded with the group listing and the given job listing
pub fn mock_with_jobs(jobs: Vec<Value>) -> MockTransport {
    MockTransport::new()
        .on(Method::Get, "config/insightsGroup", 200, insights_groups())
        .on(
            Method::Get,
            "config/insightsGroup/IG1/prechangeAnalysis",
            200,
            listing(jobs),
        )
}
