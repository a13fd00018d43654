// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment platform adapters

mod cloudhub;

pub use cloudhub::CloudHubClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePlatformClient, PlatformCall, PlatformOp};

use async_trait::async_trait;
use chd_core::{ArtifactId, DeploymentStatus};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Protocol(String),
    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for a deployment platform's management API.
///
/// Every call is a single request; implementations never retry.
#[async_trait]
pub trait PlatformClient: Clone + Send + Sync + 'static {
    /// Upload an application archive, returning the platform's id for it
    async fn upload(&self, artifact: &Path) -> Result<ArtifactId, PlatformError>;

    /// Apply runtime version, worker count and properties to the application
    async fn configure(
        &self,
        artifact: &ArtifactId,
        runtime_version: &str,
        workers: NonZeroU32,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), PlatformError>;

    /// Request a start (or restart) of the uploaded artifact
    async fn start(&self, artifact: &ArtifactId) -> Result<(), PlatformError>;

    /// Current deployment status of the artifact
    async fn status(&self, artifact: &ArtifactId) -> Result<DeploymentStatus, PlatformError>;
}
