// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration files
//!
//! Two TOML files feed a deployment: an optional per-user credentials file
//! and the project's `cloudhub.toml`. Values in the project file override
//! the user file; command-line flags override both.

use crate::project::{ProjectDescriptor, MULE_PACKAGING};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "cloudhub.toml";

/// Default management API base URL
pub const DEFAULT_URL: &str = "https://anypoint.mulesoft.com/cloudhub";

/// Default interval between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default timeout for a single management API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// Management API connection settings as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudHubSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub domain: Option<String>,
    pub environment: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl CloudHubSettings {
    /// Fill unset fields from `base`
    pub fn or(self, base: CloudHubSettings) -> Self {
        Self {
            url: self.url.or(base.url),
            username: self.username.or(base.username),
            password: self.password.or(base.password),
            domain: self.domain.or(base.domain),
            environment: self.environment.or(base.environment),
            request_timeout: self.request_timeout.or(base.request_timeout),
        }
    }

    /// Resolve into a complete connection, failing on missing credentials
    pub fn into_connection(self) -> Result<Connection, ConfigError> {
        Ok(Connection {
            url: non_empty(self.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
            username: non_empty(self.username).ok_or(ConfigError::Missing("cloudhub.username"))?,
            password: non_empty(self.password).ok_or(ConfigError::Missing("cloudhub.password"))?,
            domain: non_empty(self.domain).ok_or(ConfigError::Missing("cloudhub.domain"))?,
            environment: non_empty(self.environment),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}

/// Fully resolved management API connection
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    pub url: String,
    pub username: String,
    pub password: String,
    /// Application domain on the platform
    pub domain: String,
    pub environment: Option<String>,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("domain", &self.domain)
            .field("environment", &self.environment)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Deployment parameters as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploySettings {
    pub mule_version: Option<String>,
    pub workers: Option<NonZeroU32>,
    #[serde(with = "humantime_serde")]
    pub max_wait: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
    /// Packaging types accepted for deployment
    pub supported_packaging: Option<Vec<String>>,
    /// Application properties pushed to the platform
    pub properties: BTreeMap<String, String>,
}

impl DeploySettings {
    pub fn supported_packaging(&self) -> Vec<String> {
        self.supported_packaging
            .clone()
            .unwrap_or_else(|| vec![MULE_PACKAGING.to_string()])
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}

/// One parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub cloudhub: CloudHubSettings,
    pub deploy: DeploySettings,
    pub project: ProjectDescriptor,
}

impl ConfigFile {
    /// Parse config from TOML content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let config = Self::parse(&read_file(path)?, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load a config file, treating a missing file as empty
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load the user credentials file (connection settings only) and the
    /// project file, project values winning
    pub fn load_layered(project_path: &Path, required: bool) -> Result<Self, ConfigError> {
        let mut project = if required {
            Self::load(project_path)?
        } else {
            Self::load_optional(project_path)?
        };

        if let Some(user_path) = user_credentials_path() {
            let user = CredentialsFile::load_optional(&user_path)?;
            project.cloudhub = project.cloudhub.or(user.cloudhub);
        }

        Ok(project)
    }
}

/// The per-user credentials file. Only a `[cloudhub]` table is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsFile {
    pub cloudhub: CloudHubSettings,
}

impl CredentialsFile {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file if present
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let credentials = Self::parse(&read_file(path)?, path)?;
        tracing::debug!(path = %path.display(), "loaded user credentials");
        Ok(credentials)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// `$XDG_CONFIG_HOME/chd/credentials.toml` or the platform equivalent
pub fn user_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chd").join("credentials.toml"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
