// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Configuration management

pub mod paths;
pub mod profile;

pub use profile::{Config, Profile};

use anyhow::Result;

/// Build an "env" profile from environment variables
pub fn env_profile() -> Result<Profile> {
    let host = std::env::var("NDI_HOST").map_err(|_| anyhow::anyhow!("NDI_HOST must be set"))?;

    let mut profile = Profile::new("env".to_string(), host);

    if let Ok(token) = std::env::var("NDI_TOKEN") {
        profile.token = Some(token);
    }

    if let Ok(insecure) = std::env::var("NDI_TLS_INSECURE") {
        profile.insecure = insecure == "1" || insecure.to_lowercase() == "true";
    }

    Ok(profile)
}

/// Resolve which profile to use
///
/// Priority:
/// 1. --profile argument (or NDI_PROFILE)
/// 2. --host argument, as an ad-hoc profile
/// 3. "env" if NDI_HOST is set
/// 4. Current profile from config.json
pub fn resolve_profile(cli_profile: Option<&str>, cli_host: Option<&str>) -> Result<Profile> {
    if let Some(name) = cli_profile {
        if name == "env" {
            return env_profile();
        }
        return Profile::load(name);
    }

    if let Some(host) = cli_host {
        return Ok(Profile::new("cli".to_string(), host.to_string()));
    }

    if std::env::var("NDI_HOST").is_ok() {
        return env_profile();
    }

    let config = Config::load()?;
    if let Some(name) = config.current_profile() {
        return Profile::load(name);
    }

    Err(anyhow::anyhow!(
        "No NDI host configured. Use --host, set NDI_HOST, or add a profile under {}",
        paths::profiles_dir().display()
    ))
}
