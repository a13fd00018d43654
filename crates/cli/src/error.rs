// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every failure that reaches the terminal is rendered as:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)
//!
//! and carries the process exit code for its category.

use chd_adapters::PlatformError;
use chd_core::ConfigError;
use chd_engine::DeployError;
use std::fmt;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INVALID_ARTIFACT: u8 = 3;
pub const EXIT_REMOTE: u8 = 4;
pub const EXIT_AUTH: u8 = 5;
pub const EXIT_REJECTED: u8 = 6;
pub const EXIT_DEPLOY_FAILED: u8 = 7;
pub const EXIT_TIMED_OUT: u8 = 8;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct ChdError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Process exit code
    pub exit_code: u8,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ChdError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            exit_code: EXIT_FAILURE,
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_exit_code(mut self, code: u8) -> Self {
        self.exit_code = code;
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for ChdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ChdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<DeployError> for ChdError {
    fn from(err: DeployError) -> Self {
        let base = ChdError::new(err.to_string());
        let base = match &err {
            DeployError::InvalidArtifact(_) => base
                .with_exit_code(EXIT_INVALID_ARTIFACT)
                .with_context("Nothing was sent to the platform")
                .with_suggestion("Package the application before deploying")
                .with_suggestion("Point --artifact (or project.artifact) at the built archive"),
            DeployError::Upload(_) => base
                .with_exit_code(EXIT_REMOTE)
                .with_context("The artifact did not reach the platform")
                .with_suggestion("Check network access to cloudhub.url"),
            DeployError::Authentication { .. } => base
                .with_exit_code(EXIT_AUTH)
                .with_suggestion("Check cloudhub.username and cloudhub.password")
                .with_suggestion(
                    "Check the account has access to the domain and environment",
                ),
            DeployError::Configuration(_) => base
                .with_exit_code(EXIT_REJECTED)
                .with_context("The artifact was uploaded but not configured or started")
                .with_suggestion("Check --mule-version, --workers and the application properties"),
            DeployError::Transport { .. } => base
                .with_exit_code(EXIT_REMOTE)
                .with_context("The artifact may have been uploaded and left unstarted"),
            DeployError::DeploymentFailed { .. } => base
                .with_exit_code(EXIT_DEPLOY_FAILED)
                .with_suggestion("Check the application logs on the platform"),
            DeployError::DeploymentTimedOut { .. } => base
                .with_exit_code(EXIT_TIMED_OUT)
                .with_context("The deployment may still finish on the platform")
                .with_suggestion("Check the application status on the platform")
                .with_suggestion("Wait longer with --max-wait-ms"),
        };
        base.with_source(err)
    }
}

impl From<ConfigError> for ChdError {
    fn from(err: ConfigError) -> Self {
        let base = ChdError::new(err.to_string()).with_exit_code(EXIT_CONFIG);
        let base = match &err {
            ConfigError::NotFound(_) => {
                base.with_suggestion("Check the --config path, or omit it to use ./cloudhub.toml")
            }
            ConfigError::Missing(key) => {
                let flag = key.trim_start_matches("cloudhub.");
                base.with_suggestion(format!("Set {} in cloudhub.toml", key))
                    .with_suggestion(format!(
                        "Or pass --{} (env CLOUDHUB_{})",
                        flag,
                        flag.to_uppercase()
                    ))
            }
            ConfigError::Read { .. } | ConfigError::Parse { .. } => base,
        };
        base.with_source(err)
    }
}

impl From<PlatformError> for ChdError {
    fn from(err: PlatformError) -> Self {
        ChdError::new(err.to_string())
            .with_exit_code(EXIT_REMOTE)
            .with_source(err)
    }
}
