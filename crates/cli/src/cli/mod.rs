// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  outbox enqueue CREATE_SHIPMENT '{\"trackingNumber\":\"TR-001\"}'
  outbox list                 Show pending actions, oldest first
  outbox flush                Deliver pending actions
  outbox stats                Show queue counters";

#[derive(Parser)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first outbox for shipment service mutations")]
#[command(
    long_about = "Offline-first outbox for shipment service mutations.\n\n\
    Actions are stored durably while offline and replayed in order, with \
    bounded retries, once the service is reachable."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// State directory holding outbox.db and config.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue an action for delivery and print its id
    #[command(after_help = "Examples:\n  \
        outbox enqueue CREATE_SHIPMENT '{\"trackingNumber\":\"TR-001\"}'\n  \
        outbox enqueue update-status '{\"shipmentId\":\"s-1\",\"status\":\"cleared\"}'")]
    Enqueue {
        /// Action type (e.g. CREATE_SHIPMENT; case and '-' are tolerated)
        #[arg(value_name = "TYPE")]
        action_type: String,

        /// Payload as a JSON object
        #[arg(value_name = "JSON", value_parser = non_empty_string)]
        payload: String,
    },

    /// List pending actions, oldest first
    List {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show pending count, drain state and the most recent error
    Stats {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deliver pending actions once
    Flush {
        /// Treat the service as unreachable (the drain is a no-op)
        #[arg(long)]
        offline: bool,
    },

    /// Flush on a fixed interval until interrupted
    Watch {
        /// Seconds between drains
        #[arg(long, short, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },

    /// Discard every pending action
    Clear,

    /// Inspect and manage actions that exhausted their retries
    #[command(subcommand)]
    DeadLetters(DeadLetterCommand),
}

#[derive(Subcommand)]
pub enum DeadLetterCommand {
    /// List dead-lettered actions
    List {
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Move a dead letter back to the tail of the queue with fresh retries
    Replay {
        /// Action id
        id: String,
    },

    /// Delete every dead letter
    Purge,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
