// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod deploy;
pub mod resolve;

use chd_core::config::PROJECT_CONFIG_FILE;
use chd_core::{ConfigError, ConfigFile};
use std::path::{Path, PathBuf};

/// Where the project config comes from
pub struct ConfigSource {
    path: PathBuf,
    /// Given with `--config`, so it must exist
    explicit: bool,
}

impl ConfigSource {
    pub fn new(flag: Option<PathBuf>) -> Self {
        match flag {
            Some(path) => Self {
                path,
                explicit: true,
            },
            None => Self {
                path: PathBuf::from(PROJECT_CONFIG_FILE),
                explicit: false,
            },
        }
    }

    pub fn load(&self) -> Result<ConfigFile, ConfigError> {
        ConfigFile::load_layered(&self.path, self.explicit)
    }

    /// Directory that relative paths inside the config are resolved against
    pub fn base_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }
}

/// Explicit runtime version from the command line or the `[deploy]` table,
/// falling back through the project's dependencies and build properties
pub fn runtime_version(flag: Option<&str>, config: &ConfigFile) -> String {
    let explicit = flag
        .filter(|v| !v.trim().is_empty())
        .or(config.deploy.mule_version.as_deref());
    chd_core::resolve_for_project(explicit, &config.project)
}
