// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Invocation result accumulation
//!
//! A [`ResultBuilder`] is created per invocation, passed by `&mut` through
//! every request and lookup, and finalized exactly once into a
//! [`ModuleResult`] (success) or a [`Failure`].

use serde::Serialize;
use serde_json::{Value, json};
use strum::{Display, EnumString};

use crate::error::NdiError;
use crate::transport::Method;

/// Requested end state of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum State {
    Query,
    Present,
    Absent,
}

impl State {
    /// Whether this state may write to the server.
    pub fn is_mutating(self) -> bool {
        matches!(self, State::Present | State::Absent)
    }
}

/// How much diagnostic state is surfaced in the result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputLevel {
    #[default]
    Normal,
    Info,
    Debug,
}

/// Diagnostics about the most recent request
#[derive(Debug, Clone, Default)]
pub struct RequestTrace {
    pub method: Option<Method>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub status: Option<u16>,
    pub response: Option<Value>,
    /// Undecodable response text
    pub raw: Option<String>,
    /// Soft error recorded without failing (e.g. an unparseable 2xx body)
    pub error: Option<Value>,
}

/// Final, serializable outcome of an invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub current: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A terminal failure together with the partial result collected so far
#[derive(Debug)]
pub struct Failure {
    pub error: NdiError,
    pub result: ModuleResult,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Request-scoped accumulator for previous/proposed/existing state
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    state: State,
    output_level: OutputLevel,
    pub previous: Value,
    pub proposed: Value,
    pub sent: Value,
    pub existing: Value,
    modified: Option<bool>,
    trace: RequestTrace,
}

impl ResultBuilder {
    pub fn new(state: State, output_level: OutputLevel) -> Self {
        Self {
            state,
            output_level,
            previous: json!({}),
            proposed: json!({}),
            sent: json!({}),
            existing: json!({}),
            modified: None,
            trace: RequestTrace::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn trace(&self) -> &RequestTrace {
        &self.trace
    }

    pub(crate) fn record_request(&mut self, method: Method, path: &str) {
        self.trace.method = Some(method);
        self.trace.path = Some(path.to_string());
        self.trace.status = None;
        self.trace.response = None;
        self.trace.raw = None;
        self.trace.error = None;
    }

    pub(crate) fn record_sent(&mut self, sent: Value) {
        self.sent = sent;
    }

    pub(crate) fn record_url(&mut self, url: &str) {
        self.trace.url = Some(url.to_string());
    }

    pub(crate) fn record_response(&mut self, status: u16, response: Option<Value>) {
        self.trace.status = Some(status);
        self.trace.response = response;
    }

    pub(crate) fn record_raw(&mut self, raw: &str, error: Value) {
        self.trace.raw = Some(raw.to_string());
        self.trace.error = Some(error);
    }

    /// The transport told us explicitly whether the server changed.
    pub(crate) fn record_modified(&mut self, modified: bool) {
        self.modified = Some(modified);
    }

    /// Whether this invocation changed server state.
    ///
    /// An explicit transport signal wins. Otherwise only mutating states
    /// can report a change, and only when `existing` differs from
    /// `previous`.
    pub fn changed(&self) -> bool {
        match self.modified {
            Some(modified) => modified,
            None => self.state.is_mutating() && self.previous != self.existing,
        }
    }

    fn build(&self) -> ModuleResult {
        let mut result = ModuleResult {
            changed: self.changed(),
            current: self.existing.clone(),
            raw: self.trace.raw.clone(),
            ..Default::default()
        };

        if self.state.is_mutating() && self.output_level != OutputLevel::Normal {
            result.previous = Some(self.previous.clone());
        }

        if self.output_level == OutputLevel::Debug {
            result.method = self.trace.method.map(|m| m.to_string());
            result.url = self.trace.url.clone();
            result.status = self.trace.status;
            result.response = self.trace.response.clone();
            result.sent = Some(self.sent.clone());
            result.proposed = Some(self.proposed.clone());
        }

        result
    }

    /// Finalize a successful invocation.
    pub fn finish(self) -> ModuleResult {
        let mut result = self.build();
        if let Some(error) = &self.trace.error {
            result.error = Some(error.clone());
        }
        result
    }

    /// Finalize a failed invocation, keeping all diagnostics collected.
    pub fn fail(self, error: NdiError) -> Failure {
        let mut result = self.build();
        result.failed = true;
        result.msg = Some(error.to_string());
        result.error = Some(error.payload());
        if let Some(raw) = error.raw() {
            result.raw = Some(raw.to_string());
        }
        Failure { error, result }
    }
}
