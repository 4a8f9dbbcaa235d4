// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for ndi-client

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

/// Errors that can terminate an NDI invocation
#[derive(Error, Debug)]
pub enum NdiError {
    /// Invocation options failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// A local input file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A local input file exists but could not be read
    #[error("Failed to read {path}: {source}", path = .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transport could not produce a response at all
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// The message decoded as JSON, when it was JSON
        payload: Option<Value>,
    },

    /// The server answered with an error status and no body
    #[error("Connection failed for {url}. {msg}")]
    Connection { url: String, msg: String },

    /// The server answered with a structured `{code, message}` error
    #[error("NDI Error {code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
        payload: Value,
    },

    /// The server answered with a JSON error body lacking a `code`
    #[error("NDI Error: {payload}")]
    UnstructuredServer { status: u16, payload: Value },

    /// The server answered with an error status and a non-JSON body
    #[error("Unable to parse error output as JSON, see 'raw' output. {reason}")]
    ErrorPayloadParse {
        status: u16,
        raw: String,
        reason: String,
    },

    /// A status code outside every handled class
    #[error("Unexpected response status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Insights group '{0}' not found")]
    GroupNotFound(String),

    #[error("Site '{site}' not found in insights group '{group}'")]
    SiteNotFound { group: String, site: String },

    #[error("No finished epoch available for site '{0}'")]
    NoFinishedEpoch(String),

    /// A successful response did not have the expected shape
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid NDI host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl NdiError {
    /// Structured error payload reported alongside the failure message.
    pub fn payload(&self) -> Value {
        match self {
            NdiError::Transport {
                payload: Some(payload),
                ..
            } => payload.clone(),
            NdiError::Transport { message, .. } => json!({ "message": message }),
            NdiError::Server { payload, .. } | NdiError::UnstructuredServer { payload, .. } => {
                payload.clone()
            }
            NdiError::ErrorPayloadParse { reason, .. } => json!({
                "code": -1,
                "message": format!(
                    "Unable to parse error output as JSON, see 'raw' output. {}",
                    reason
                ),
            }),
            other => json!({ "message": other.to_string() }),
        }
    }

    /// Raw response text worth surfacing for diagnosis, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            NdiError::ErrorPayloadParse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
