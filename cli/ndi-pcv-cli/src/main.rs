// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! ndi-pcv - manage pre-change validations on Nexus Dashboard Insights

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ndi_client::{
    HttpTransport, NdiClient, OutputLevel, PcvOptions, ResultBuilder, RunSettings, State,
};

mod config;
mod output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StateArg {
    /// Read back a job result (or list jobs)
    Query,
    /// Create the analysis unless it already exists
    Present,
    /// Delete the analysis if it exists
    Absent,
}

impl From<StateArg> for State {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Query => State::Query,
            StateArg::Present => State::Present,
            StateArg::Absent => State::Absent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputLevelArg {
    Normal,
    Info,
    Debug,
}

impl From<OutputLevelArg> for OutputLevel {
    fn from(level: OutputLevelArg) -> Self {
        match level {
            OutputLevelArg::Normal => OutputLevel::Normal,
            OutputLevelArg::Info => OutputLevel::Info,
            OutputLevelArg::Debug => OutputLevel::Debug,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "ndi-pcv",
    version,
    about = "Manage pre-change validations on Nexus Dashboard Insights",
    long_about = "Query, create and delete pre-change validation (PCV) analyses on \
                  Nexus Dashboard Insights. Prints the result as JSON."
)]
struct Cli {
    /// Connection profile to use
    #[arg(short, long, env = "NDI_PROFILE")]
    profile: Option<String>,

    /// Nexus Dashboard URL
    #[arg(short = 'H', long, env = "NDI_HOST")]
    host: Option<String>,

    /// Bearer token
    #[arg(long, env = "NDI_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(
        short = 'k',
        long,
        env = "NDI_TLS_INSECURE",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    insecure: bool,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Telemetry API root override
    #[arg(long)]
    api_root: Option<String>,

    /// Name of the insights group
    #[arg(long, visible_alias = "fab-name")]
    ig_name: String,

    /// Name of the assurance entity (site)
    #[arg(long, visible_alias = "site")]
    site_name: Option<String>,

    /// Name of the pre-change validation
    #[arg(long)]
    name: Option<String>,

    /// Description for the pre-change validation
    #[arg(long, visible_alias = "descr")]
    description: Option<String>,

    /// Create the analysis from this change file
    #[arg(long, conflicts_with = "manual")]
    file: Option<PathBuf>,

    /// Create the analysis from this inline JSON change-list
    #[arg(long)]
    manual: Option<String>,

    /// Desired state
    #[arg(long, value_enum, default_value_t = StateArg::Query)]
    state: StateArg,

    /// How much request diagnostics to include in the output
    #[arg(long, value_enum, default_value_t = OutputLevelArg::Normal, env = "NDI_OUTPUT_LEVEL")]
    output_level: OutputLevelArg,

    /// Report what would change without changing anything
    #[arg(long)]
    check: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> PcvOptions {
        PcvOptions {
            ig_name: self.ig_name.clone(),
            site_name: self.site_name.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            file: self.file.clone(),
            manual: self.manual.clone(),
            state: Some(self.state.into()),
        }
    }

    fn settings(&self) -> RunSettings {
        RunSettings {
            check_mode: self.check,
            output_level: self.output_level.into(),
        }
    }

    /// Build the NDI client from the resolved profile plus CLI overrides
    fn build_client(&self) -> Result<NdiClient<HttpTransport>> {
        let mut profile =
            config::resolve_profile(self.profile.as_deref(), self.host.as_deref())?;

        if self.profile.is_some()
            && let Some(host) = &self.host
        {
            profile.host = host.clone();
        }
        if let Some(token) = &self.token {
            profile.token = Some(token.clone());
        }
        if self.insecure {
            profile.insecure = true;
        }

        let mut transport_config = profile.transport_config();
        if let Some(timeout) = self.timeout {
            transport_config.timeout = Duration::from_secs(timeout);
        }
        tracing::debug!(profile = %profile.name, host = %transport_config.host, "using profile");

        let transport = HttpTransport::new(&transport_config)
            .with_context(|| format!("Failed to set up connection to {}", profile.host))?;

        let mut client =
            NdiClient::new(transport).with_patch_validation(profile.patch_validation);
        if let Some(root) = self.api_root.as_ref().or(profile.api_root.as_ref()) {
            client = client.with_api_root(root.clone());
        }
        Ok(client)
    }
}

fn init_tracing(verbose: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "ndi_pcv=debug,ndi_client=debug".to_string()
        } else {
            "warn".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings();
    let task = match cli.options().validate() {
        Ok(task) => task,
        Err(error) => {
            let failure =
                ResultBuilder::new(cli.state.into(), settings.output_level).fail(error);
            return output::report_failure(&failure);
        }
    };

    let client = cli.build_client()?;
    match ndi_client::pcv::run(&client, &task, settings).await {
        Ok(result) => output::report_success(&result),
        Err(failure) => output::report_failure(&failure),
    }
}
