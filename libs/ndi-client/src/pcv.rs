// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Pre-change validation workflow
//!
//! [`PcvOptions`] is the raw option set of one invocation. It is validated
//! into a [`PcvTask`] before anything touches the network, and [`run`]
//! carries the task out:
//!
//! - `query` reads back a job result (or the job listing)
//! - `present` creates a job unless one with the same name exists on the site
//! - `absent` deletes the job if it exists

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::info;

use crate::error::NdiError;
use crate::lookup;
use crate::paths;
use crate::query::QueryParams;
use crate::request::{ApiRequest, NdiClient};
use crate::result::{Failure, ModuleResult, OutputLevel, ResultBuilder, State};
use crate::transport::{FilePart, MultipartBody, Transport};
use crate::types::{JobRef, PcvCreateRequest, PcvJob};

/// Unvalidated invocation options
#[derive(Debug, Clone, Default)]
pub struct PcvOptions {
    pub ig_name: String,
    pub site_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub file: Option<PathBuf>,
    pub manual: Option<String>,
    pub state: Option<State>,
}

/// The change set a new analysis is built from
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeSet {
    /// Uploaded file contents
    File { file_name: String, content: Vec<u8> },
    /// Parsed inline change-list
    Manual(Value),
}

/// A validated invocation
#[derive(Debug, Clone, PartialEq)]
pub enum PcvTask {
    Query {
        ig_name: String,
        site_name: Option<String>,
        name: Option<String>,
    },
    Present {
        ig_name: String,
        site_name: String,
        name: String,
        description: Option<String>,
        changes: ChangeSet,
    },
    Absent {
        ig_name: String,
        site_name: String,
        name: String,
    },
}

impl PcvTask {
    pub fn state(&self) -> State {
        match self {
            PcvTask::Query { .. } => State::Query,
            PcvTask::Present { .. } => State::Present,
            PcvTask::Absent { .. } => State::Absent,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, what: &str, state: State) -> Result<String, NdiError> {
    value.ok_or_else(|| {
        NdiError::InvalidInput(format!(
            "state is {} but all of the following are missing: {}",
            state, what
        ))
    })
}

fn read_change_file(path: &Path) -> Result<ChangeSet, NdiError> {
    if !path.exists() {
        return Err(NdiError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read(path).map_err(|source| NdiError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ChangeSet::File { file_name, content })
}

impl PcvOptions {
    /// Check required/exclusive options and load local inputs.
    pub fn validate(self) -> Result<PcvTask, NdiError> {
        let ig_name = self.ig_name.trim().to_string();
        if ig_name.is_empty() {
            return Err(NdiError::InvalidInput("ig_name is required".to_string()));
        }
        let state = self.state.unwrap_or(State::Query);
        let site_name = non_empty(self.site_name);
        let name = non_empty(self.name);

        match state {
            State::Query => {
                if name.is_some() && site_name.is_none() {
                    return Err(NdiError::InvalidInput(
                        "site_name is required when querying a named pre-change validation"
                            .to_string(),
                    ));
                }
                Ok(PcvTask::Query {
                    ig_name,
                    site_name,
                    name,
                })
            }
            State::Present => {
                let name = require(name, "name", state)?;
                let site_name = require(site_name, "site_name", state)?;
                let changes = match (self.file, non_empty(self.manual)) {
                    (Some(_), Some(_)) => {
                        return Err(NdiError::InvalidInput(
                            "parameters are mutually exclusive: file|manual".to_string(),
                        ));
                    }
                    (Some(path), None) => read_change_file(&path)?,
                    (None, Some(manual)) => {
                        let parsed = serde_json::from_str(&manual).map_err(|e| {
                            NdiError::InvalidInput(format!("manual is not valid JSON: {}", e))
                        })?;
                        ChangeSet::Manual(parsed)
                    }
                    (None, None) => {
                        return Err(NdiError::InvalidInput(
                            "state is present but any of the following are missing: file, manual"
                                .to_string(),
                        ));
                    }
                };
                Ok(PcvTask::Present {
                    ig_name,
                    site_name,
                    name,
                    description: self.description,
                    changes,
                })
            }
            State::Absent => Ok(PcvTask::Absent {
                name: require(name, "name", state)?,
                site_name: require(site_name, "site_name", state)?,
                ig_name,
            }),
        }
    }
}

/// Per-invocation settings that are not part of the task itself
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSettings {
    /// Dry run: report what would change without writing
    pub check_mode: bool,
    pub output_level: OutputLevel,
}

/// Carry out `task`, returning the finalized result or the failure with
/// whatever diagnostics were collected before it.
pub async fn run<T: Transport>(
    client: &NdiClient<T>,
    task: &PcvTask,
    settings: RunSettings,
) -> Result<ModuleResult, Failure> {
    let mut rb = ResultBuilder::new(task.state(), settings.output_level);
    match execute(client, task, settings.check_mode, &mut rb).await {
        Ok(()) => Ok(rb.finish()),
        Err(error) => Err(rb.fail(error)),
    }
}

async fn execute<T: Transport>(
    client: &NdiClient<T>,
    task: &PcvTask,
    check_mode: bool,
    rb: &mut ResultBuilder,
) -> Result<(), NdiError> {
    match task {
        PcvTask::Query {
            ig_name,
            site_name,
            name,
        } => query(client, rb, ig_name, site_name.as_deref(), name.as_deref()).await,
        PcvTask::Present {
            ig_name,
            site_name,
            name,
            description,
            changes,
        } => {
            present(
                client,
                rb,
                ig_name,
                site_name,
                name,
                description.as_deref(),
                changes,
                check_mode,
            )
            .await
        }
        PcvTask::Absent {
            ig_name,
            site_name,
            name,
        } => absent(client, rb, ig_name, site_name, name, check_mode).await,
    }
}

async fn site_id<T: Transport>(
    client: &NdiClient<T>,
    rb: &mut ResultBuilder,
    ig_name: &str,
    site_name: &str,
) -> Result<String, NdiError> {
    lookup::resolve_site_id(client, rb, ig_name, site_name)
        .await?
        .ok_or_else(|| NdiError::SiteNotFound {
            group: ig_name.to_string(),
            site: site_name.to_string(),
        })
}

fn job_value(job: &PcvJob) -> Result<Value, NdiError> {
    Ok(serde_json::to_value(job)?)
}

async fn query<T: Transport>(
    client: &NdiClient<T>,
    rb: &mut ResultBuilder,
    ig_name: &str,
    site_name: Option<&str>,
    name: Option<&str>,
) -> Result<(), NdiError> {
    let Some(site_name) = site_name else {
        let jobs = lookup::list_pcv_jobs(client, rb, ig_name).await?;
        rb.existing = serde_json::to_value(&jobs)?;
        return Ok(());
    };

    let site = site_id(client, rb, ig_name, site_name).await?;
    let jobs = lookup::list_pcv_jobs(client, rb, ig_name).await?;
    let result_path = |job: &PcvJob| paths::job_result(ig_name, site_name, &job.job_id);

    let result = match name {
        Some(name) => {
            lookup::find_job_result(client, rb, &jobs, name, &site, result_path).await?
        }
        None => match jobs.iter().find(|job| job.fabric_uuid == site) {
            Some(latest) => Some(lookup::job_result(client, rb, &result_path(latest)).await?),
            None => None,
        },
    };
    rb.existing = result.unwrap_or_else(|| json!({}));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn present<T: Transport>(
    client: &NdiClient<T>,
    rb: &mut ResultBuilder,
    ig_name: &str,
    site_name: &str,
    name: &str,
    description: Option<&str>,
    changes: &ChangeSet,
    check_mode: bool,
) -> Result<(), NdiError> {
    let site = site_id(client, rb, ig_name, site_name).await?;
    let jobs = lookup::list_pcv_jobs(client, rb, ig_name).await?;

    if let Some(job) = lookup::find_job(&jobs, name, &site) {
        info!(name, job_id = %job.job_id, "pre-change validation already exists");
        rb.previous = job_value(job)?;
        rb.existing = rb.previous.clone();
        return Ok(());
    }

    let epoch = lookup::latest_epoch(
        client,
        rb,
        &paths::epochs(ig_name, site_name),
        &QueryParams::new(),
    )
    .await?
    .ok_or_else(|| NdiError::NoFinishedEpoch(site_name.to_string()))?;

    let mut payload = PcvCreateRequest::new(name, description, site_name, &epoch);
    let request = match changes {
        ChangeSet::Manual(imdata) => {
            payload.imdata = Some(imdata.clone());
            ApiRequest::post(paths::pcv_manual_changes(ig_name, site_name))
                .query("action", Some("RUN"))
                .json(serde_json::to_value(&payload)?)
        }
        ChangeSet::File { file_name, content } => {
            payload.uploaded_file_name = Some(file_name.clone());
            ApiRequest::post(paths::pcv_file_changes(ig_name, site_name)).multipart(
                MultipartBody {
                    fields: vec![("data".to_string(), serde_json::to_string(&payload)?)],
                    file: FilePart {
                        field: "file".to_string(),
                        file_name: file_name.clone(),
                        content: content.clone(),
                    },
                },
            )
        }
    };
    rb.proposed = serde_json::to_value(&payload)?;

    if check_mode {
        info!(name, "check mode: skipping pre-change validation create");
        rb.existing = rb.proposed.clone();
        return Ok(());
    }

    info!(name, base_epoch = %epoch.epoch_id, "creating pre-change validation");
    let created = client.request(rb, request).await?;
    rb.existing = created;
    Ok(())
}

async fn absent<T: Transport>(
    client: &NdiClient<T>,
    rb: &mut ResultBuilder,
    ig_name: &str,
    site_name: &str,
    name: &str,
    check_mode: bool,
) -> Result<(), NdiError> {
    let site = site_id(client, rb, ig_name, site_name).await?;
    let jobs = lookup::list_pcv_jobs(client, rb, ig_name).await?;

    let Some(job) = lookup::find_job(&jobs, name, &site) else {
        return Ok(());
    };
    if job.job_id.is_empty() {
        return Err(NdiError::InvalidInput(format!(
            "pre-change validation '{}' has no job ID",
            name
        )));
    }

    rb.previous = job_value(job)?;

    if !check_mode {
        info!(name, job_id = %job.job_id, "deleting pre-change validation");
        let body = serde_json::to_value(vec![JobRef {
            job_id: job.job_id.clone(),
        }])?;
        client
            .request(rb, ApiRequest::post(paths::pcv_delete(ig_name)).json(body))
            .await?;
    }
    rb.existing = json!({});
    Ok(())
}
