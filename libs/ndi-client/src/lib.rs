// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Nexus Dashboard Insights (NDI) client
//!
//! A thin wrapper over the NDI telemetry REST API, focused on pre-change
//! validation (PCV): submitting a proposed configuration change, comparing
//! it against an epoch baseline, and reading back the event-severity
//! assessment.
//!
//! ## Usage
//!
//! ```ignore
//! use ndi_client::{HttpTransport, NdiClient, PcvOptions, RunSettings, State, TransportConfig};
//!
//! let transport = HttpTransport::new(&TransportConfig::new("https://nd.example.com"))?;
//! let client = NdiClient::new(transport);
//!
//! let task = PcvOptions {
//!     ig_name: "IG1".to_string(),
//!     site_name: Some("siteA".to_string()),
//!     name: Some("pcv1".to_string()),
//!     state: Some(State::Query),
//!     ..Default::default()
//! }
//! .validate()?;
//!
//! let result = ndi_client::pcv::run(&client, &task, RunSettings::default()).await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```
//!
//! Authentication, TLS and timeouts belong to the [`Transport`]; the
//! wrapper only builds URIs, encodes bodies and classifies responses.

pub mod error;
pub mod lookup;
pub mod paths;
pub mod pcv;
pub mod query;
pub mod request;
pub mod result;
pub mod transport;
pub mod types;

pub use error::NdiError;
pub use pcv::{ChangeSet, PcvOptions, PcvTask, RunSettings};
pub use query::QueryParams;
pub use request::{ApiRequest, NdiClient, RequestBody};
pub use result::{Failure, ModuleResult, OutputLevel, ResultBuilder, State};
pub use transport::{
    HttpTransport, Method, Payload, Transport, TransportConfig, TransportError,
    TransportRequest, TransportResponse,
};
pub use types::{AssuranceEntity, Epoch, InsightsGroup, PcvJob};
