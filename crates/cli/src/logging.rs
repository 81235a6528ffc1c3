// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` selects the filter (default `warn`); `--verbose` overrides it
//! with `debug`. Command output goes to stdout and is never mixed with logs.

use tracing_subscriber::EnvFilter;

use crate::env::vars;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

/// Install the global subscriber. Later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let rust_log = std::env::var(vars::RUST_LOG).ok();
    let directive = filter_directive(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pick the filter directive from the verbosity flag and `RUST_LOG`.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>) -> &str {
    if verbose {
        return VERBOSE_FILTER;
    }
    match rust_log {
        Some(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_FILTER,
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
