// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Profile management types

use std::path::Path;
use std::time::Duration;

use ndi_client::TransportConfig;
use ndi_client::transport::DEFAULT_TIMEOUT_SECS;
use serde::Deserialize;

/// A connection profile
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile name
    #[serde(default)]
    pub name: String,

    /// Nexus Dashboard URL
    pub host: String,

    /// Bearer token (optional)
    pub token: Option<String>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// HTTP timeout in seconds (optional)
    pub timeout_secs: Option<u64>,

    /// Telemetry API root override (optional)
    pub api_root: Option<String>,

    /// Let the server validate PATCH bodies
    #[serde(default)]
    pub patch_validation: bool,
}

impl Profile {
    /// Create a new profile
    pub fn new(name: String, host: String) -> Self {
        Self {
            name,
            host,
            token: None,
            insecure: false,
            timeout_secs: None,
            api_root: None,
            patch_validation: false,
        }
    }

    /// Load a profile by name from the profiles directory
    pub fn load(name: &str) -> anyhow::Result<Self> {
        let mut profile = Self::load_from(&super::paths::profile_path(name))
            .map_err(|e| anyhow::anyhow!("Failed to load profile '{}': {}", name, e))?;
        if profile.name.is_empty() {
            profile.name = name.to_string();
        }
        Ok(profile)
    }

    /// Load a profile from a file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let profile: Profile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        Ok(profile)
    }

    /// Connection settings for the HTTP transport
    pub fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::new(self.host.clone());
        config.token = self.token.clone();
        config.insecure = self.insecure;
        config.timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        config
    }
}

/// Main configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Current active profile name
    pub profile: Option<String>,
}

impl Config {
    /// Load the main config file
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&super::paths::config_file())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the current profile name
    pub fn current_profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.json");
        std::fs::write(
            &path,
            r#"{
                "host": "https://nd.lab.example.com",
                "token": "abc",
                "insecure": true,
                "timeoutSecs": 5
            }"#,
        )
        .unwrap();

        let profile = Profile::load_from(&path).unwrap();
        assert_eq!(profile.host, "https://nd.lab.example.com");
        assert!(profile.insecure);

        let config = profile.transport_config();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_timeout() {
        let profile = Profile::new("x".to_string(), "https://nd".to_string());
        assert_eq!(
            profile.transport_config().timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.current_profile(), None);
    }
}
