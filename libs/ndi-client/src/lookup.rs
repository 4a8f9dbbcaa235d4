// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Domain lookups on top of the request wrapper
//!
//! These helpers know the JSON shapes of the insights-group, pre-change
//! analysis and epoch endpoints. They are stateless apart from the
//! diagnostics they leave on the [`ResultBuilder`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::NdiError;
use crate::paths;
use crate::query::QueryParams;
use crate::request::{ApiRequest, NdiClient};
use crate::result::ResultBuilder;
use crate::transport::Transport;
use crate::types::{Epoch, InsightsGroup, Listing, PcvJob};

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, NdiError> {
    serde_json::from_value(value).map_err(|source| NdiError::Decode {
        path: path.to_string(),
        source,
    })
}

async fn list<T, R>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    request: ApiRequest,
) -> Result<Vec<T>, NdiError>
where
    T: DeserializeOwned,
    R: Transport,
{
    let path = request.path.clone();
    let value = client.request(rb, request).await?;
    let listing: Listing<T> = decode(&path, value)?;
    Ok(listing.into_data())
}

/// Resolve a site name to its UUID within an insights group.
///
/// `Ok(None)` means the group exists but has no such site.
pub async fn resolve_site_id<R: Transport>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    ig_name: &str,
    site_name: &str,
) -> Result<Option<String>, NdiError> {
    let groups: Vec<InsightsGroup> =
        list(client, rb, ApiRequest::get(paths::insights_groups())).await?;

    let group = groups
        .into_iter()
        .find(|g| g.name == ig_name)
        .ok_or_else(|| NdiError::GroupNotFound(ig_name.to_string()))?;

    let site_id = group
        .assurance_entities
        .into_iter()
        .find(|site| site.name == site_name)
        .map(|site| site.uuid);
    debug!(ig_name, site_name, site_id = ?site_id, "resolved site");
    Ok(site_id)
}

/// List pre-change analysis jobs, newest first as ordered by the server.
pub async fn list_pcv_jobs<R: Transport>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    ig_name: &str,
) -> Result<Vec<PcvJob>, NdiError> {
    let request = ApiRequest::get(paths::pcv_jobs(ig_name)).query("$sort", Some(paths::PCV_SORT));
    list(client, rb, request).await
}

/// First job with this name on this site.
pub fn find_job<'a>(jobs: &'a [PcvJob], name: &str, site_id: &str) -> Option<&'a PcvJob> {
    jobs.iter().find(|job| job.matches(name, site_id))
}

/// Fetch the result payload of the first job matching `name` and `site_id`.
///
/// `result_path` maps the matched job to its result endpoint.
pub async fn find_job_result<R, F>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    jobs: &[PcvJob],
    name: &str,
    site_id: &str,
    result_path: F,
) -> Result<Option<Value>, NdiError>
where
    R: Transport,
    F: Fn(&PcvJob) -> String,
{
    let Some(job) = find_job(jobs, name, site_id) else {
        return Ok(None);
    };
    job_result(client, rb, &result_path(job)).await.map(Some)
}

/// Fetch a job result from its endpoint.
pub async fn job_result<R: Transport>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    path: &str,
) -> Result<Value, NdiError> {
    client.request(rb, ApiRequest::get(path)).await
}

/// Most recent finished epoch at `path`.
pub async fn latest_epoch<R: Transport>(
    client: &NdiClient<R>,
    rb: &mut ResultBuilder,
    path: &str,
    filters: &QueryParams,
) -> Result<Option<Epoch>, NdiError> {
    let request = ApiRequest::get(path)
        .query_params(filters)
        .query("$size", Some("1"))
        .query("$status", Some("FINISHED"));
    let epochs: Vec<Epoch> = list(client, rb, request).await?;
    Ok(epochs.into_iter().next())
}
