// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::list::print_actions;
use super::Context;
use crate::cli::{DeadLetterCommand, OutputFormat};
use crate::error::Result;

pub fn run(ctx: &Context, command: DeadLetterCommand) -> Result<()> {
    match command {
        DeadLetterCommand::List { output } => list(ctx, output),
        DeadLetterCommand::Replay { id } => replay(ctx, &id),
        DeadLetterCommand::Purge => purge(ctx),
    }
}

fn list(ctx: &Context, output: OutputFormat) -> Result<()> {
    let dead = ctx.open_queue()?.list_dead_letters()?;
    print_actions(&dead, output, "no dead letters")
}

fn replay(ctx: &Context, id: &str) -> Result<()> {
    let replayed = ctx.open_queue()?.replay_dead_letter(id)?;
    println!("replayed {}", replayed.id);
    Ok(())
}

fn purge(ctx: &Context) -> Result<()> {
    let purged = ctx.open_queue()?.purge_dead_letters()?;
    println!("purged {} dead letter(s)", purged);
    Ok(())
}
