// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! NDI resource models
//!
//! Only the fields this crate acts on are modelled. Everything else the
//! server sends is kept in `extra` so records can be echoed back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Listing envelope shared by the NDI list endpoints:
/// `{"value": {"data": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub value: ListingValue<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingValue<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Listing<T> {
    pub fn into_data(self) -> Vec<T> {
        self.value.data
    }
}

/// Tenant-scoped grouping of monitored sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsGroup {
    pub name: String,
    #[serde(default)]
    pub assurance_entities: Vec<AssuranceEntity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A monitored network fabric ("site")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceEntity {
    pub name: String,
    pub uuid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Network-state snapshot used as an analysis baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    pub epoch_id: String,
    pub collection_time_msecs: i64,
    pub fabric_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pre-change validation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcvJob {
    pub job_id: String,
    pub name: String,
    pub fabric_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_epoch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PcvJob {
    pub fn matches(&self, name: &str, site_id: &str) -> bool {
        self.name == name && self.fabric_uuid == site_id
    }
}

/// Body for creating a pre-change analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PcvCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub allow_unsupported_object_modification: bool,
    /// Submission time, milliseconds since the Unix epoch
    pub analysis_submission_time: i64,
    pub base_epoch_id: String,
    pub base_epoch_collection_timestamp: i64,
    pub fabric_uuid: String,
    pub assurance_entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_file_name: Option<String>,
}

impl PcvCreateRequest {
    /// Payload for a new analysis baselined on `epoch`.
    pub fn new(name: &str, description: Option<&str>, site_name: &str, epoch: &Epoch) -> Self {
        Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            allow_unsupported_object_modification: true,
            analysis_submission_time: chrono::Utc::now().timestamp_millis(),
            base_epoch_id: epoch.epoch_id.clone(),
            base_epoch_collection_timestamp: epoch.collection_time_msecs,
            fabric_uuid: epoch.fabric_id.clone(),
            assurance_entity_name: site_name.to_string(),
            imdata: None,
            uploaded_file_name: None,
        }
    }
}

/// One entry of the delete-jobs request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub job_id: String,
}
