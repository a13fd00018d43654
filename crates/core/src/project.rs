// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-side description of the project being deployed
//!
//! The build tool has already packaged the application; this is what it
//! tells us about the result.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Packaging type of a deployable Mule application
pub const MULE_PACKAGING: &str = "mule";

/// A declared dependency of the project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Whether this is the `group:artifact` coordinate given
    pub fn is(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }
}

/// Pre-resolved project inputs: built artifact, packaging, dependencies and
/// build properties
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectDescriptor {
    /// Path of the packaged application archive
    pub artifact: Option<PathBuf>,
    pub packaging: String,
    pub dependencies: Vec<Dependency>,
    /// Build properties, e.g. `mule.version`
    pub properties: BTreeMap<String, String>,
}

impl Default for ProjectDescriptor {
    fn default() -> Self {
        Self {
            artifact: None,
            packaging: MULE_PACKAGING.to_string(),
            dependencies: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl ProjectDescriptor {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
