// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::{ActionQueue, Store};

use super::Context;
use crate::error::Result;

pub fn run(ctx: &Context) -> Result<()> {
    let queue = ctx.open_queue()?;
    let removed = run_impl(&queue)?;
    println!("cleared {} pending action(s)", removed);
    Ok(())
}

/// Empty the live queue. Returns how many actions were discarded.
pub(crate) fn run_impl<S: Store>(queue: &ActionQueue<S>) -> Result<usize> {
    let count = queue.size()?;
    queue.clear()?;
    Ok(count)
}
