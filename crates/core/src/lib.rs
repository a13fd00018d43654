// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chd-core: Core library for the chd CloudHub deployment tool
//!
//! This crate provides:
//! - The deployment data model (request, remote status, outcome)
//! - Runtime version resolution
//! - Configuration file loading
//! - Clock and ID abstractions for deterministic tests

pub mod clock;
pub mod config;
pub mod deployment;
pub mod id;
pub mod project;
pub mod version;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    CloudHubSettings, ConfigError, ConfigFile, Connection, CredentialsFile, DeploySettings,
};
pub use deployment::{
    ArtifactId, DeploymentOutcome, DeploymentRequest, DeploymentStatus, FinalStatus,
    DEFAULT_MAX_WAIT, DEFAULT_WORKERS,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use project::{Dependency, ProjectDescriptor, MULE_PACKAGING};
pub use version::{resolve, resolve_for_project, DEFAULT_RUNTIME_VERSION};
