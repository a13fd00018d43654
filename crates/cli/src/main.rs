// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chd - CloudHub deployment CLI

mod commands;
mod error;
mod logging;

use clap::{Parser, Subcommand};
use commands::{deploy, resolve, ConfigSource};
use error::ChdError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "chd",
    version,
    about = "Deploy packaged Mule applications to CloudHub"
)]
struct Cli {
    /// Project config file [default: ./cloudhub.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload, configure and start the application, then wait for it to run
    Deploy(deploy::DeployArgs),
    /// Print the runtime version a deployment would use
    ResolveVersion(resolve::ResolveArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::setup_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprint!("{}", ChdError::new(format!("{:#}", e)));
            return ExitCode::from(error::EXIT_FAILURE);
        }
    };

    let source = ConfigSource::new(cli.config);
    let result = match cli.command {
        Commands::Deploy(args) => deploy::deploy(args, &source).await,
        Commands::ResolveVersion(args) => resolve::resolve_version(args, &source),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code, error = ?err.source, "exiting");
            eprint!("{}", err);
            ExitCode::from(err.exit_code)
        }
    }
}
