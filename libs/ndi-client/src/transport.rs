// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Connection to the Nexus Dashboard host
//!
//! The request wrapper never talks HTTP itself. It hands a fully built
//! [`TransportRequest`] to a [`Transport`] and classifies whatever comes
//! back. Authentication, TLS and timeouts all live behind this trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use strum::{Display, EnumString};
use url::Url;

use crate::error::NdiError;

/// Default HTTP timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP methods used against the NDI API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A file attached to a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// A multipart/form-data body: text fields plus one file
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

impl MultipartBody {
    /// Text fields as a JSON object, for diagnostics.
    ///
    /// Fields that hold JSON documents are decoded so they read naturally
    /// in the reported `sent` value.
    pub fn describe(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            let decoded =
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()));
            map.insert(name.clone(), decoded);
        }
        map.insert(
            self.file.field.clone(),
            Value::String(self.file.file_name.clone()),
        );
        Value::Object(map)
    }
}

/// Body as handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already-serialized JSON document
    Json(String),
    Multipart(MultipartBody),
}

/// A single outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute path plus encoded query string
    pub uri: String,
    pub payload: Option<Payload>,
}

impl TransportRequest {
    /// The URI without its query string.
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }

    /// The encoded query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, q)| q)
    }
}

/// Everything the transport learned from the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    /// Resolved URL the request was sent to
    pub url: String,
    pub status: u16,
    /// Response body; `None` when the server sent nothing
    pub body: Option<String>,
    /// Transport-level status message
    pub msg: String,
    /// Explicit modification signal, when the transport knows better than
    /// a before/after comparison
    pub modified: Option<bool>,
}

/// The transport failed before any response was received
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.url, self.message)
    }
}

impl std::error::Error for TransportError {}

/// Trait abstraction for the host connection used by the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Connection settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the Nexus Dashboard host, e.g. `https://nd.example.com`
    pub host: String,
    /// Bearer token; authentication is otherwise left to the host
    pub token: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            insecure: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Install the process-wide rustls crypto provider.
///
/// reqwest is built without a provider, so one has to be in place before
/// the first client is constructed. Repeated calls are harmless.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, NdiError> {
        let base_url = Url::parse(&config.host).map_err(|e| NdiError::InvalidHost {
            host: config.host.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(NdiError::InvalidHost {
                host: config.host.clone(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| NdiError::HttpClient(format!("invalid token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        install_crypto_provider();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("ndi-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| NdiError::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self
            .base_url
            .join(&request.uri)
            .map_err(|e| TransportError {
                url: request.uri.clone(),
                message: e.to_string(),
            })?;

        let method = request.method;
        let mut builder = self.client.request(method.into(), url.clone());
        builder = match request.payload {
            Some(Payload::Json(body)) => {
                builder.header(CONTENT_TYPE, "application/json").body(body)
            }
            Some(Payload::Multipart(multipart)) => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in multipart.fields {
                    form = form.text(name, value);
                }
                let part = reqwest::multipart::Part::bytes(multipart.file.content)
                    .file_name(multipart.file.file_name);
                builder.multipart(form.part(multipart.file.field, part))
            }
            None => builder,
        };

        let response = builder.send().await.map_err(|e| TransportError {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let resolved = response.url().to_string();
        let body = response.text().await.map_err(|e| TransportError {
            url: resolved.clone(),
            message: format!("failed to read response body: {}", e),
        })?;

        let msg = match status.canonical_reason() {
            Some(reason) => format!("{} {} ({} bytes)", status.as_u16(), reason, body.len()),
            None => format!("{} ({} bytes)", status.as_u16(), body.len()),
        };

        Ok(TransportResponse {
            url: resolved,
            status: status.as_u16(),
            body: if body.is_empty() { None } else { Some(body) },
            msg,
            modified: (method != Method::Get && status.is_success()).then_some(true),
        })
    }
}
