// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf: diagnose and repair CUPS printing problems

mod color;
mod commands;
mod env;
mod exit_error;
mod output;
mod run_log;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pf_engine::Registry;
use tracing_subscriber::EnvFilter;

use crate::commands::list::ListArgs;
use crate::commands::run::RunArgs;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pf", version, about = "Diagnose and repair CUPS printing problems", styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available fixers
    List(ListArgs),
    /// Run a fixer on this host or a remote one
    Run(RunArgs),
}

/// Diagnostics go to stderr so stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let registry = Registry::builtin();
    match cli.command {
        Commands::List(args) => commands::list::handle(args, &registry, cli.output),
        Commands::Run(args) => commands::run::handle(args, &registry, cli.output).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("error: {:#}", e);
        std::process::exit(exit_error::FAILED);
    }
}
