// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment orchestration
//!
//! One deployment runs start to finish inside `deploy`: validate, upload,
//! configure, start, then poll until the platform reports a terminal status
//! or the deadline passes. Nothing is rolled back on failure; an artifact
//! may be uploaded and left unstarted.

use crate::error::{DeployError, Step};
use chd_adapters::PlatformClient;
use chd_core::{
    ArtifactId, Clock, DeploymentOutcome, DeploymentRequest, DeploymentStatus, FinalStatus,
    IdGen, MULE_PACKAGING,
};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Polls closer together than this are clamped
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Orchestrator policy
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Time between status polls
    pub poll_interval: Duration,
    /// Packaging types accepted for deployment
    pub supported_packaging: Vec<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: chd_core::config::DEFAULT_POLL_INTERVAL,
            supported_packaging: vec![MULE_PACKAGING.to_string()],
        }
    }
}

impl OrchestratorConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn with_supported_packaging<I, S>(mut self, packaging: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_packaging = packaging.into_iter().map(Into::into).collect();
        self
    }
}

/// Drives a platform through one deployment
pub struct Orchestrator<P, C: Clock, I: IdGen> {
    client: P,
    clock: C,
    id_gen: I,
    config: OrchestratorConfig,
}

impl<P, C, I> Orchestrator<P, C, I>
where
    P: PlatformClient,
    C: Clock,
    I: IdGen,
{
    pub fn new(client: P, clock: C, id_gen: I, config: OrchestratorConfig) -> Self {
        Self {
            client,
            clock,
            id_gen,
            config,
        }
    }

    /// Deploy the request's artifact and wait for it to start.
    ///
    /// Returns an outcome once the platform reports `Started` or `Failed`, or
    /// once `max_wait` of polling has passed. Validation and platform errors
    /// abort the run immediately.
    pub async fn deploy(
        &self,
        request: DeploymentRequest,
    ) -> Result<DeploymentOutcome, DeployError> {
        let run_id = self.id_gen.next();
        let span = tracing::info_span!(
            "deploy",
            run_id = %run_id,
            artifact = %request.artifact_path().display(),
            runtime_version = request.runtime_version(),
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: DeploymentRequest) -> Result<DeploymentOutcome, DeployError> {
        validate_request(&request, &self.config)?;

        let started_at = self.clock.now();

        let artifact = self
            .client
            .upload(request.artifact_path())
            .await
            .map_err(|e| DeployError::from_platform(Step::Upload, e))?;

        self.client
            .configure(
                &artifact,
                request.runtime_version(),
                request.workers(),
                request.properties(),
            )
            .await
            .map_err(|e| DeployError::from_platform(Step::Configure, e))?;

        self.client
            .start(&artifact)
            .await
            .map_err(|e| DeployError::from_platform(Step::Start, e))?;

        let final_status = self.wait_for_start(&artifact, request.max_wait()).await?;
        let outcome = DeploymentOutcome::new(final_status, self.elapsed_since(started_at));

        match outcome.final_status {
            FinalStatus::Started => tracing::info!(
                artifact_id = %artifact,
                elapsed_ms = outcome.elapsed_millis(),
                "deployment started"
            ),
            FinalStatus::Failed => tracing::error!(
                artifact_id = %artifact,
                elapsed_ms = outcome.elapsed_millis(),
                "deployment failed on the platform"
            ),
            FinalStatus::TimedOut { last_seen } => tracing::warn!(
                artifact_id = %artifact,
                elapsed_ms = outcome.elapsed_millis(),
                %last_seen,
                "gave up waiting; deployment may still complete remotely"
            ),
        }

        Ok(outcome)
    }

    /// Poll until a terminal status or until `max_wait` has passed.
    ///
    /// The first poll happens immediately. No poll is issued after the
    /// deadline.
    async fn wait_for_start(
        &self,
        artifact: &ArtifactId,
        max_wait: Duration,
    ) -> Result<FinalStatus, DeployError> {
        let polling_since = self.clock.now();
        let interval = self.config.poll_interval.max(MIN_POLL_INTERVAL);

        loop {
            let status = self
                .client
                .status(artifact)
                .await
                .map_err(|e| DeployError::from_platform(Step::Status, e))?;

            match status {
                DeploymentStatus::Started => return Ok(FinalStatus::Started),
                DeploymentStatus::Failed => return Ok(FinalStatus::Failed),
                DeploymentStatus::Pending | DeploymentStatus::Deploying => {}
            }

            let waited = self.elapsed_since(polling_since);
            if waited >= max_wait {
                return Ok(FinalStatus::TimedOut { last_seen: status });
            }

            tracing::debug!(
                %status,
                waited_ms = millis(waited),
                "waiting"
            );
            self.clock.sleep(interval.min(max_wait - waited)).await;
        }
    }

    fn elapsed_since(&self, since: Instant) -> Duration {
        self.clock.now().saturating_duration_since(since)
    }
}

/// Reject unsupported packaging and missing artifacts before any network
/// call
pub fn validate_request(
    request: &DeploymentRequest,
    config: &OrchestratorConfig,
) -> Result<(), DeployError> {
    let packaging = request.packaging();
    if !config.supported_packaging.iter().any(|p| p == packaging) {
        return Err(DeployError::InvalidArtifact(format!(
            "unsupported packaging type <{}>, expected one of: {}",
            packaging,
            config.supported_packaging.join(", ")
        )));
    }

    let path = request.artifact_path();
    let meta = std::fs::metadata(path).map_err(|e| {
        DeployError::InvalidArtifact(format!(
            "no built application at {} ({}); has the package step run?",
            path.display(),
            e
        ))
    })?;
    if !meta.is_file() {
        return Err(DeployError::InvalidArtifact(format!(
            "{} is not a file",
            path.display()
        )));
    }
    std::fs::File::open(path).map_err(|e| {
        DeployError::InvalidArtifact(format!("cannot read {}: {}", path.display(), e))
    })?;

    tracing::debug!(packaging, bytes = meta.len(), "artifact validated");
    Ok(())
}

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Turn a non-started outcome into the matching error
pub fn ensure_started(outcome: DeploymentOutcome) -> Result<DeploymentOutcome, DeployError> {
    match outcome.final_status {
        FinalStatus::Started => Ok(outcome),
        FinalStatus::Failed => Err(DeployError::DeploymentFailed {
            elapsed_ms: outcome.elapsed_millis(),
        }),
        FinalStatus::TimedOut { last_seen } => Err(DeployError::DeploymentTimedOut {
            elapsed_ms: outcome.elapsed_millis(),
            last_seen,
        }),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
