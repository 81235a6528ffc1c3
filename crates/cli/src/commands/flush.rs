// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use outbox_core::FlushOutcome;

use super::{runtime, Context};
use crate::display::format_flush_outcome;
use crate::error::Result;

pub fn run(ctx: &Context, offline: bool) -> Result<()> {
    let queue = ctx.open_queue()?;
    let engine = ctx.engine(Arc::clone(&queue), !offline)?;

    let outcome = if offline {
        runtime()?.block_on(engine.flush())?
    } else {
        match ctx.try_lock_drain()? {
            Some(_lock) => runtime()?.block_on(engine.flush())?,
            None => FlushOutcome::AlreadyDraining,
        }
    };

    let last_error = engine.last_error();
    println!(
        "{}",
        format_flush_outcome(&outcome, queue.size()?, last_error.as_deref())
    );
    Ok(())
}
