// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake platform client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PlatformClient, PlatformError};
use async_trait::async_trait;
use chd_core::{ArtifactId, DeploymentStatus, IdGen, SequentialIdGen};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Upload {
        path: PathBuf,
    },
    Configure {
        artifact: ArtifactId,
        runtime_version: String,
        workers: NonZeroU32,
        properties: BTreeMap<String, String>,
    },
    Start {
        artifact: ArtifactId,
    },
    Status {
        artifact: ArtifactId,
    },
}

/// Platform operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOp {
    Upload,
    Configure,
    Start,
    Status,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<PlatformCall>,
    statuses: VecDeque<DeploymentStatus>,
    last_status: Option<DeploymentStatus>,
    failures: HashMap<PlatformOp, PlatformError>,
}

/// Fake platform client for testing.
///
/// Status polls return the scripted statuses in order; once the script runs
/// out the last status repeats (`Pending` if nothing was scripted).
#[derive(Clone)]
pub struct FakePlatformClient {
    state: Arc<Mutex<FakeState>>,
    ids: SequentialIdGen,
}

impl Default for FakePlatformClient {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            ids: SequentialIdGen::new("artifact"),
        }
    }
}

impl FakePlatformClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the statuses returned by successive polls
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = DeploymentStatus>) -> Self {
        self.lock().statuses.extend(statuses);
        self
    }

    /// Make the next call of `op` fail with `error`
    pub fn fail_next(&self, op: PlatformOp, error: PlatformError) {
        self.lock().failures.insert(op, error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock().calls.clone()
    }

    /// Number of status polls made
    pub fn status_polls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, PlatformCall::Status { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: PlatformOp, call: PlatformCall) -> Result<(), PlatformError> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlatformClient for FakePlatformClient {
    async fn upload(&self, artifact: &Path) -> Result<ArtifactId, PlatformError> {
        self.record(
            PlatformOp::Upload,
            PlatformCall::Upload {
                path: artifact.to_path_buf(),
            },
        )?;
        Ok(ArtifactId::new(self.ids.next()))
    }

    async fn configure(
        &self,
        artifact: &ArtifactId,
        runtime_version: &str,
        workers: NonZeroU32,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), PlatformError> {
        self.record(
            PlatformOp::Configure,
            PlatformCall::Configure {
                artifact: artifact.clone(),
                runtime_version: runtime_version.to_string(),
                workers,
                properties: properties.clone(),
            },
        )
    }

    async fn start(&self, artifact: &ArtifactId) -> Result<(), PlatformError> {
        self.record(
            PlatformOp::Start,
            PlatformCall::Start {
                artifact: artifact.clone(),
            },
        )
    }

    async fn status(&self, artifact: &ArtifactId) -> Result<DeploymentStatus, PlatformError> {
        self.record(
            PlatformOp::Status,
            PlatformCall::Status {
                artifact: artifact.clone(),
            },
        )?;

        let mut state = self.lock();
        let status = match state.statuses.pop_front() {
            Some(status) => status,
            None => state.last_status.unwrap_or(DeploymentStatus::Pending),
        };
        state.last_status = Some(status);
        Ok(status)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
