// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Endpoint paths, relative to the versioned telemetry API root

/// Root of the NDI telemetry API on a Nexus Dashboard host
pub const DEFAULT_API_ROOT: &str = "/sedgeapi/v1/cisco-nir/api/api/telemetry";

/// API version segment used unless a request opts out
pub const DEFAULT_API_VERSION: &str = "v2";

/// Sort applied to pre-change analysis listings (newest first)
pub const PCV_SORT: &str = "-analysisSubmissionTime";

fn seg(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

pub fn insights_groups() -> String {
    "config/insightsGroup".to_string()
}

pub fn pcv_jobs(ig_name: &str) -> String {
    format!("config/insightsGroup/{}/prechangeAnalysis", seg(ig_name))
}

pub fn pcv_delete(ig_name: &str) -> String {
    format!("{}/jobs", pcv_jobs(ig_name))
}

fn site_pcv(ig_name: &str, site_name: &str) -> String {
    format!(
        "config/insightsGroup/{}/fabric/{}/prechangeAnalysis",
        seg(ig_name),
        seg(site_name)
    )
}

pub fn pcv_file_changes(ig_name: &str, site_name: &str) -> String {
    format!("{}/fileChanges", site_pcv(ig_name, site_name))
}

pub fn pcv_manual_changes(ig_name: &str, site_name: &str) -> String {
    format!("{}/manualChanges", site_pcv(ig_name, site_name))
}

pub fn epochs(ig_name: &str, site_name: &str) -> String {
    format!(
        "events/insightsGroup/{}/fabric/{}/epochs",
        seg(ig_name),
        seg(site_name)
    )
}

pub fn job_result(ig_name: &str, site_name: &str, job_id: &str) -> String {
    format!(
        "epochDelta/insightsGroup/{}/fabric/{}/job/{}/health/view/eventSeverity",
        seg(ig_name),
        seg(site_name),
        seg(job_id)
    )
}
