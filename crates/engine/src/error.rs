// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for deployment orchestration

use chd_adapters::PlatformError;
use chd_core::DeploymentStatus;
use std::fmt;
use thiserror::Error;

/// Remote step during which a platform call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Configure,
    Start,
    Status,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Upload => "upload",
            Step::Configure => "configure",
            Step::Start => "start",
            Step::Status => "status poll",
        };
        f.write_str(s)
    }
}

/// Errors that abort a deployment. None of them are retried.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
    #[error("upload failed: {0}")]
    Upload(#[source] PlatformError),
    #[error("authentication rejected during {step}: {message}")]
    Authentication { step: Step, message: String },
    #[error("configuration rejected: {0}")]
    Configuration(String),
    #[error("{step} failed: {source}")]
    Transport {
        step: Step,
        #[source]
        source: PlatformError,
    },
    #[error("deployment failed on the platform after {elapsed_ms}ms")]
    DeploymentFailed { elapsed_ms: u64 },
    /// The remote deployment may still complete after this is returned.
    #[error("deployment did not start within {elapsed_ms}ms (last status: {last_seen})")]
    DeploymentTimedOut {
        elapsed_ms: u64,
        last_seen: DeploymentStatus,
    },
}

impl DeployError {
    /// Classify a platform failure at the given step
    pub fn from_platform(step: Step, err: PlatformError) -> Self {
        match (step, err) {
            (_, PlatformError::Authentication(message)) => {
                DeployError::Authentication { step, message }
            }
            (Step::Upload, err) => DeployError::Upload(err),
            (Step::Configure, PlatformError::Rejected { message, .. }) => {
                DeployError::Configuration(message)
            }
            (step, source) => DeployError::Transport { step, source },
        }
    }
}
