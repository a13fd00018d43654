// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Print the runtime version a deployment would use

use super::{runtime_version, ConfigSource};
use crate::error::ChdError;
use clap::Args;

#[derive(Args)]
pub struct ResolveArgs {
    /// Runtime version override
    #[arg(long, env = "CLOUDHUB_MULE_VERSION")]
    pub mule_version: Option<String>,
}

pub fn resolve_version(args: ResolveArgs, source: &ConfigSource) -> Result<(), ChdError> {
    let config = source.load()?;
    println!("{}", runtime_version(args.mule_version.as_deref(), &config));
    Ok(())
}
