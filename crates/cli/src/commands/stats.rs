// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::{ActionQueue, Store};

use super::{newest_action_error, Context};
use crate::cli::OutputFormat;
use crate::display::{format_stats, StatsView};
use crate::error::Result;

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let queue = ctx.open_queue()?;
    // A drain in another process holds the lock.
    let processing = ctx.try_lock_drain()?.is_none();
    let stats = run_impl(&queue, processing)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => println!("{}", format_stats(&stats)),
    }
    Ok(())
}

pub(crate) fn run_impl<S: Store>(queue: &ActionQueue<S>, processing: bool) -> Result<StatsView> {
    Ok(StatsView {
        pending: queue.size()?,
        processing,
        last_error: newest_action_error(queue)?,
        dead_letters: queue.dead_letter_count()?,
    })
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
