// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::{ActionQueue, ActionType, Store};
use serde_json::Value;

use super::Context;
use crate::error::{Error, Result};

pub fn run(ctx: &Context, action_type: &str, payload: &str) -> Result<()> {
    let queue = ctx.open_queue()?;
    let id = run_impl(&queue, action_type, payload)?;
    println!("{}", id);
    Ok(())
}

/// Parse and enqueue. Returns the new action id.
pub(crate) fn run_impl<S: Store>(
    queue: &ActionQueue<S>,
    action_type: &str,
    payload: &str,
) -> Result<String> {
    let action_type: ActionType = action_type.parse()?;
    let payload: Value = serde_json::from_str(payload).map_err(Error::PayloadJson)?;
    Ok(queue.enqueue_raw(action_type, payload)?)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
