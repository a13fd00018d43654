// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::platform::{PlatformClient, PlatformError};
use async_trait::async_trait;
use chd_core::{ArtifactId, DeploymentStatus};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;
use tracing::Instrument;

/// Wrapper that adds tracing to any PlatformClient
#[derive(Clone)]
pub struct TracedPlatformClient<C> {
    inner: C,
}

impl<C> TracedPlatformClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: PlatformClient> PlatformClient for TracedPlatformClient<C> {
    async fn upload(&self, artifact: &Path) -> Result<ArtifactId, PlatformError> {
        let span = tracing::info_span!("platform.upload", artifact = %artifact.display());

        async {
            // Precondition: artifact must be a readable file
            let size = match std::fs::metadata(artifact) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => {
                    tracing::error!("artifact is not a regular file");
                    return Err(PlatformError::Io {
                        path: artifact.to_path_buf(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "not a regular file",
                        ),
                    });
                }
                Err(source) => {
                    tracing::error!(error = %source, "artifact does not exist");
                    return Err(PlatformError::Io {
                        path: artifact.to_path_buf(),
                        source,
                    });
                }
            };

            tracing::info!(bytes = size, "uploading");

            let start = std::time::Instant::now();
            let result = self.inner.upload(artifact).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(id) => tracing::info!(
                    artifact_id = %id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "uploaded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "upload failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn configure(
        &self,
        artifact: &ArtifactId,
        runtime_version: &str,
        workers: NonZeroU32,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.configure", artifact_id = %artifact);

        async {
            tracing::info!(
                runtime_version,
                workers = workers.get(),
                property_count = properties.len(),
                "configuring"
            );

            let result = self
                .inner
                .configure(artifact, runtime_version, workers, properties)
                .await;

            match &result {
                Ok(()) => tracing::info!("configured"),
                Err(e) => tracing::error!(error = %e, "configure failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn start(&self, artifact: &ArtifactId) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.start", artifact_id = %artifact);

        async {
            let result = self.inner.start(artifact).await;
            match &result {
                Ok(()) => tracing::info!("start requested"),
                Err(e) => tracing::error!(error = %e, "start failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn status(&self, artifact: &ArtifactId) -> Result<DeploymentStatus, PlatformError> {
        let result = self.inner.status(artifact).await;
        match &result {
            Ok(status) => tracing::debug!(artifact_id = %artifact, %status, "polled"),
            Err(e) => tracing::warn!(artifact_id = %artifact, error = %e, "status poll failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
