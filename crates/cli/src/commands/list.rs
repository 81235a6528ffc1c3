// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::QueuedAction;

use super::Context;
use crate::cli::OutputFormat;
use crate::display::format_action_line;
use crate::error::Result;

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let actions = ctx.open_queue()?.list_ordered()?;
    print_actions(&actions, output, "no pending actions")
}

/// Print actions as text lines or as a JSON array.
pub(crate) fn print_actions(
    actions: &[QueuedAction],
    output: OutputFormat,
    empty: &str,
) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(actions)?);
        }
        OutputFormat::Text if actions.is_empty() => println!("{}", empty),
        OutputFormat::Text => {
            for action in actions {
                println!("{}", format_action_line(action));
            }
        }
    }
    Ok(())
}
