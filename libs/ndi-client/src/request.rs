// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Generic NDI request wrapper
//!
//! [`NdiClient::request`] builds the full URI, hands the request to the
//! [`Transport`], and sorts the response into success, no-content,
//! not-found-on-delete or error. Every step is recorded on the caller's
//! [`ResultBuilder`].

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::NdiError;
use crate::paths::{DEFAULT_API_ROOT, DEFAULT_API_VERSION};
use crate::query::{QueryParams, append_query};
use crate::result::ResultBuilder;
use crate::transport::{
    Method, MultipartBody, Payload, Transport, TransportRequest, TransportResponse,
};

/// Request body before serialization
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    fn is_empty(&self) -> bool {
        match self {
            RequestBody::Json(Value::Null) => true,
            RequestBody::Json(Value::Object(map)) => map.is_empty(),
            RequestBody::Json(Value::Array(items)) => items.is_empty(),
            _ => false,
        }
    }

    /// What gets reported as `sent`.
    fn describe(&self) -> Value {
        match self {
            RequestBody::Json(value) => value.clone(),
            RequestBody::Multipart(multipart) => multipart.describe(),
        }
    }
}

/// A single call against the NDI API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: String,
    pub method: Method,
    pub body: Option<RequestBody>,
    pub query: QueryParams,
    /// Version segment; `None` sends `path` verbatim
    pub api_version: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            query: QueryParams::new(),
            api_version: Some(DEFAULT_API_VERSION.to_string()),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = Some(RequestBody::Multipart(body));
        self
    }

    /// Add a query parameter; `None` values are never encoded.
    pub fn query(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.query.insert(key.into(), value.map(Into::into));
        self
    }

    pub fn query_params(mut self, params: &QueryParams) -> Self {
        for (key, value) in params {
            self.query.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn api_version(mut self, version: Option<&str>) -> Self {
        self.api_version = version.map(str::to_string);
        self
    }
}

/// Request wrapper over a [`Transport`]
pub struct NdiClient<T> {
    transport: T,
    api_root: String,
    patch_validation: bool,
}

impl<T: Transport> NdiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_root: DEFAULT_API_ROOT.to_string(),
            patch_validation: false,
        }
    }

    /// Override the telemetry API root.
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into().trim_end_matches('/').to_string();
        self
    }

    /// Let the server validate PATCH bodies.
    ///
    /// By default every PATCH carries `validate=false`.
    pub fn with_patch_validation(mut self, enabled: bool) -> Self {
        self.patch_validation = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URI (path plus encoded query) for `request`.
    pub fn build_uri(&self, request: &ApiRequest) -> String {
        let base = match &request.api_version {
            Some(version) => format!(
                "{}/{}/{}",
                self.api_root,
                version,
                request.path.trim_start_matches('/')
            ),
            None => request.path.clone(),
        };
        append_query(&base, &request.query)
    }

    /// Send `request` and classify the response.
    pub async fn request(
        &self,
        rb: &mut ResultBuilder,
        mut request: ApiRequest,
    ) -> Result<Value, NdiError> {
        rb.record_request(request.method, &request.path);

        if request.method == Method::Patch {
            match &request.body {
                None => return Ok(json!({})),
                Some(body) if body.is_empty() => return Ok(json!({})),
                Some(_) => {}
            }
            if !self.patch_validation {
                request
                    .query
                    .insert("validate".to_string(), Some("false".to_string()));
            }
        }

        let uri = self.build_uri(&request);
        rb.record_url(&uri);

        let payload = match &request.body {
            Some(body) => {
                rb.record_sent(body.describe());
                Some(match body {
                    RequestBody::Json(value) => Payload::Json(serde_json::to_string(value)?),
                    RequestBody::Multipart(multipart) => Payload::Multipart(multipart.clone()),
                })
            }
            None => None,
        };

        debug!(method = %request.method, uri = %uri, "sending NDI request");
        let outcome = self
            .transport
            .send(TransportRequest {
                method: request.method,
                uri: uri.clone(),
                payload,
            })
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(uri = %uri, error = %e.message, "NDI transport failure");
                let payload = serde_json::from_str::<Value>(&e.message).ok();
                return Err(NdiError::Transport {
                    message: e.message,
                    payload,
                });
            }
        };

        rb.record_url(&response.url);
        debug!(status = response.status, url = %response.url, "NDI response");

        let modified = response.modified;
        let value = classify(request.method, response, rb)?;
        // Reads never count as changes; a write counts unless the transport says otherwise.
        if request.method != Method::Get {
            rb.record_modified(modified.unwrap_or(true));
        }
        Ok(value)
    }
}

/// Sort a transport response into a value or an error.
pub fn classify(
    method: Method,
    response: TransportResponse,
    rb: &mut ResultBuilder,
) -> Result<Value, NdiError> {
    let status = response.status;
    let body = response.body.as_deref().map(str::trim).filter(|b| !b.is_empty());

    match status {
        200..=202 => {
            let Some(text) = body else {
                rb.record_response(status, Some(json!({})));
                return Ok(json!({}));
            };
            match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    rb.record_response(status, Some(value.clone()));
                    Ok(value)
                }
                Err(e) => {
                    warn!(status, "NDI response is not JSON");
                    rb.record_response(status, None);
                    rb.record_raw(
                        text,
                        json!({
                            "code": -1,
                            "message": format!(
                                "Unable to parse output as JSON, see 'raw' output. {}",
                                e
                            ),
                        }),
                    );
                    Ok(Value::Null)
                }
            }
        }
        204 => {
            rb.record_response(status, Some(json!({})));
            Ok(json!({}))
        }
        404 if method == Method::Delete => {
            rb.record_response(status, Some(json!({})));
            Ok(json!({}))
        }
        400.. => {
            let Some(text) = body else {
                rb.record_response(status, None);
                return Err(NdiError::Connection {
                    url: response.url,
                    msg: response.msg,
                });
            };
            match serde_json::from_str::<Value>(text) {
                Ok(payload) => {
                    rb.record_response(status, Some(payload.clone()));
                    match payload.get("code") {
                        Some(code) => Err(NdiError::Server {
                            status,
                            code: scalar(code),
                            message: payload.get("message").map(scalar).unwrap_or_default(),
                            payload: payload.clone(),
                        }),
                        None => Err(NdiError::UnstructuredServer { status, payload }),
                    }
                }
                Err(e) => {
                    rb.record_response(status, None);
                    Err(NdiError::ErrorPayloadParse {
                        status,
                        raw: text.to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        _ => {
            rb.record_response(status, None);
            Err(NdiError::UnexpectedStatus {
                status,
                url: response.url,
            })
        }
    }
}

/// Render a JSON scalar without quotes around strings.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
