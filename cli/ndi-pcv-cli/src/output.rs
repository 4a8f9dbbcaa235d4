// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Result reporting
//!
//! stdout carries exactly one JSON document per run, success or failure.
//! Logs go to stderr.

use std::process::ExitCode;

use ndi_client::{Failure, ModuleResult};
use tracing::error;

/// Print a successful result.
pub fn report_success(result: &ModuleResult) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(ExitCode::SUCCESS)
}

/// Print a failed result (with `failed: true` and `msg`) and signal failure.
pub fn report_failure(failure: &Failure) -> anyhow::Result<ExitCode> {
    error!(error = %failure.error, "pre-change validation run failed");
    println!("{}", serde_json::to_string_pretty(&failure.result)?);
    Ok(ExitCode::FAILURE)
}
