// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox_cli - command-line front end for the shipment action outbox.
//!
//! This crate wires [`outbox_core`] to a state directory on disk:
//!
//! - [`Config`] - `<state_dir>/config.toml` (service URL, retry policy)
//! - [`commands`] - one module per subcommand
//! - [`Error`] - error type for all CLI operations
//!
//! ```rust,ignore
//! use clap::Parser;
//! use outbox_cli::{run, Cli};
//!
//! run(Cli::parse())?;
//! ```

mod cli;
pub mod commands;
mod display;
mod env;

pub mod config;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command, DeadLetterCommand, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

use commands::Context;

/// Execute a parsed command line. This is the main entry point for library
/// users and keeps `main` free of logic.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.state_dir)?;
    tracing::debug!(state_dir = %ctx.state_dir.display(), "resolved state directory");

    match cli.command {
        Command::Enqueue {
            action_type,
            payload,
        } => commands::enqueue::run(&ctx, &action_type, &payload),
        Command::List { output } => commands::list::run(&ctx, output),
        Command::Stats { output } => commands::stats::run(&ctx, output),
        Command::Flush { offline } => commands::flush::run(&ctx, offline),
        Command::Watch { interval } => commands::watch::run(&ctx, interval),
        Command::Clear => commands::clear::run(&ctx),
        Command::DeadLetters(command) => commands::dead_letters::run(&ctx, command),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
