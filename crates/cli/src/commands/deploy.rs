// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chd deploy`

use super::{runtime_version, ConfigSource};
use crate::error::ChdError;
use chd_adapters::{CloudHubClient, TracedPlatformClient};
use chd_core::{
    CloudHubSettings, ConfigFile, DeploymentRequest, SystemClock, UuidIdGen, DEFAULT_MAX_WAIT,
    DEFAULT_WORKERS,
};
use chd_engine::{
    ensure_started, validate_request, DeployError, Orchestrator, OrchestratorConfig,
};
use clap::Args;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args)]
pub struct DeployArgs {
    /// Packaged application archive
    #[arg(long, value_name = "PATH")]
    pub artifact: Option<PathBuf>,

    /// Packaging type of the project
    #[arg(long)]
    pub packaging: Option<String>,

    /// Runtime version override
    #[arg(long, env = "CLOUDHUB_MULE_VERSION")]
    pub mule_version: Option<String>,

    /// Number of workers
    #[arg(long, env = "CLOUDHUB_WORKERS")]
    pub workers: Option<NonZeroU32>,

    /// How long to wait for the application to start, in milliseconds
    #[arg(long, env = "CLOUDHUB_MAX_WAIT_MS", value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// Time between status polls (e.g. 3s, 500ms)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Application property, repeatable
    #[arg(
        short = 'p',
        long = "property",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value
    )]
    pub properties: Vec<(String, String)>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Management API connection overrides
#[derive(Args, Default)]
pub struct ConnectionArgs {
    /// Management API base URL
    #[arg(long, env = "CLOUDHUB_URL")]
    pub url: Option<String>,

    #[arg(long, env = "CLOUDHUB_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "CLOUDHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Application domain to deploy into
    #[arg(long, env = "CLOUDHUB_DOMAIN")]
    pub domain: Option<String>,

    /// Target environment id
    #[arg(long, env = "CLOUDHUB_ENVIRONMENT")]
    pub environment: Option<String>,
}

impl ConnectionArgs {
    fn into_settings(self) -> CloudHubSettings {
        CloudHubSettings {
            url: self.url,
            username: self.username,
            password: self.password,
            domain: self.domain,
            environment: self.environment,
            request_timeout: None,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no '=' found in '{}'", s))?;
    let key = s[..pos].trim();
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in '{}'", s));
    }
    Ok((key.to_string(), s[pos + 1..].to_string()))
}

pub async fn deploy(args: DeployArgs, source: &ConfigSource) -> Result<(), ChdError> {
    let config = source.load()?;
    let orchestrator_config = OrchestratorConfig::default()
        .with_poll_interval(
            args.poll_interval
                .unwrap_or_else(|| config.deploy.poll_interval()),
        )
        .with_supported_packaging(config.deploy.supported_packaging());

    let request = build_request(
        args.artifact,
        args.packaging,
        args.mule_version.as_deref(),
        args.workers,
        args.max_wait_ms.map(Duration::from_millis),
        args.properties,
        &config,
        source.base_dir(),
    )?;
    validate_request(&request, &orchestrator_config)?;

    let connection = args
        .connection
        .into_settings()
        .or(config.cloudhub.clone())
        .into_connection()?;
    let client = TracedPlatformClient::new(CloudHubClient::new(&connection)?);
    let orchestrator = Orchestrator::new(client, SystemClock, UuidIdGen, orchestrator_config);

    println!(
        "Deploying {} to {} (runtime {}, {} worker(s))",
        request.artifact_path().display(),
        connection.domain,
        request.runtime_version(),
        request.workers()
    );

    let outcome = ensure_started(orchestrator.deploy(request).await?)?;

    println!(
        "Started {} in {:.1}s",
        connection.domain,
        outcome.elapsed.as_secs_f64()
    );
    Ok(())
}

/// Merge command-line values over the config file into a request
#[allow(clippy::too_many_arguments)]
fn build_request(
    artifact: Option<PathBuf>,
    packaging: Option<String>,
    mule_version: Option<&str>,
    workers: Option<NonZeroU32>,
    max_wait: Option<Duration>,
    properties: Vec<(String, String)>,
    config: &ConfigFile,
    base_dir: &Path,
) -> Result<DeploymentRequest, DeployError> {
    let artifact = match artifact {
        Some(path) => path,
        None => config
            .project
            .artifact
            .as_ref()
            .map(|path| base_dir.join(path))
            .ok_or_else(|| {
                DeployError::InvalidArtifact(
                    "no artifact given; pass --artifact or set project.artifact".to_string(),
                )
            })?,
    };
    let packaging = packaging.unwrap_or_else(|| config.project.packaging.clone());
    let version = runtime_version(mule_version, config);

    Ok(DeploymentRequest::new(artifact, packaging, version)
        .with_workers(workers.or(config.deploy.workers).unwrap_or(DEFAULT_WORKERS))
        .with_max_wait(
            max_wait
                .or(config.deploy.max_wait)
                .unwrap_or(DEFAULT_MAX_WAIT),
        )
        .with_properties(config.deploy.properties.clone())
        .with_properties(properties))
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
