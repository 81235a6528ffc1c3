// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use super::{runtime, Context};
use crate::error::Result;

/// Drain every `interval_secs` until Ctrl-C.
pub fn run(ctx: &Context, interval_secs: u64) -> Result<()> {
    let Some(_lock) = ctx.try_lock_drain()? else {
        println!("a drain is already in progress");
        return Ok(());
    };

    let queue = ctx.open_queue()?;
    let engine = ctx.engine(Arc::clone(&queue), true)?;
    tracing::info!(
        state_dir = %ctx.state_dir.display(),
        interval_secs,
        "watching outbox"
    );

    runtime()?.block_on(engine.run_every(Duration::from_secs(interval_secs), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {}", e);
        }
    }));

    println!("stopped ({} pending)", queue.size()?);
    Ok(())
}
