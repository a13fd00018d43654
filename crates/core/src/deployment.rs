// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment request, remote status and outcome types

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of workers allocated to the application
pub const DEFAULT_WORKERS: NonZeroU32 = NonZeroU32::MIN;

/// Default time to wait for the application to start
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(120_000);

/// Everything needed to deploy one artifact.
///
/// Built once per invocation from already-resolved inputs and consumed by
/// value, so it cannot be reused or modified once handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    artifact_path: PathBuf,
    packaging: String,
    runtime_version: String,
    workers: NonZeroU32,
    max_wait: Duration,
    properties: BTreeMap<String, String>,
}

impl DeploymentRequest {
    pub fn new(
        artifact_path: impl Into<PathBuf>,
        packaging: impl Into<String>,
        runtime_version: impl Into<String>,
    ) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            packaging: packaging.into(),
            runtime_version: runtime_version.into(),
            workers: DEFAULT_WORKERS,
            max_wait: DEFAULT_MAX_WAIT,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_workers(mut self, workers: NonZeroU32) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    pub fn workers(&self) -> NonZeroU32 {
        self.workers
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

/// Opaque identifier the platform assigns to an uploaded artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote deployment status. Transitions are driven by the platform; the
/// client only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    Pending,
    Deploying,
    Started,
    Failed,
}

impl DeploymentStatus {
    /// Whether polling can stop at this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Started | DeploymentStatus::Failed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Started => "started",
            DeploymentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Where a deployment ended up when the orchestrator stopped watching it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatus {
    Started,
    Failed,
    /// The deadline passed first. The remote side may still finish.
    TimedOut { last_seen: DeploymentStatus },
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalStatus::Started => f.write_str("started"),
            FinalStatus::Failed => f.write_str("failed"),
            FinalStatus::TimedOut { last_seen } => {
                write!(f, "timed out (last seen: {})", last_seen)
            }
        }
    }
}

/// Result of a deployment that got as far as polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub success: bool,
    pub final_status: FinalStatus,
    pub elapsed: Duration,
}

impl DeploymentOutcome {
    pub fn new(final_status: FinalStatus, elapsed: Duration) -> Self {
        Self {
            success: final_status == FinalStatus::Started,
            final_status,
            elapsed,
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
