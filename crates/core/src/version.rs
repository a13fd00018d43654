// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime version resolution
//!
//! Candidates in order: explicit setting, the `org.mule:mule-core`
//! dependency, the `mule.version` build property, the built-in default.
//! The first non-blank candidate wins.

use crate::project::{Dependency, ProjectDescriptor};

/// Runtime used when nothing else names one
pub const DEFAULT_RUNTIME_VERSION: &str = "3.3.1";

/// Group id of the runtime core dependency
pub const RUNTIME_CORE_GROUP: &str = "org.mule";

/// Artifact id of the runtime core dependency
pub const RUNTIME_CORE_ARTIFACT: &str = "mule-core";

/// Build property naming the runtime version
pub const RUNTIME_VERSION_PROPERTY: &str = "mule.version";

/// Resolve the runtime version. Never returns an empty string.
pub fn resolve(
    explicit: Option<&str>,
    dependencies: &[Dependency],
    build_property: Option<&str>,
    default: &str,
) -> String {
    if let Some(version) = non_blank(explicit) {
        tracing::debug!(version, "using explicit runtime version");
        return version.to_string();
    }

    let from_dependency = dependencies
        .iter()
        .filter(|d| d.is(RUNTIME_CORE_GROUP, RUNTIME_CORE_ARTIFACT))
        .find_map(|d| non_blank(Some(&d.version)));
    if let Some(version) = from_dependency {
        tracing::debug!(version, "using runtime core dependency version");
        return version.to_string();
    }

    if let Some(version) = non_blank(build_property) {
        tracing::debug!(version, property = RUNTIME_VERSION_PROPERTY, "using build property");
        return version.to_string();
    }

    let version = non_blank(Some(default)).unwrap_or(DEFAULT_RUNTIME_VERSION);
    tracing::debug!(version, "using default runtime version");
    version.to_string()
}

/// Resolve against a project descriptor with the built-in default
pub fn resolve_for_project(explicit: Option<&str>, project: &ProjectDescriptor) -> String {
    resolve(
        explicit,
        &project.dependencies,
        project.property(RUNTIME_VERSION_PROPERTY),
        DEFAULT_RUNTIME_VERSION,
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
