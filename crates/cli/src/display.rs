// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering for command output.

use outbox_core::{Action, FlushOutcome, QueuedAction};
use serde::Serialize;

/// Longest error message shown on a list line.
const MAX_ERROR_WIDTH: usize = 80;

/// Queue counters as shown by `outbox stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub pending: usize,
    pub processing: bool,
    pub last_error: Option<String>,
    pub dead_letters: usize,
}

/// What an action is about: its tracking number or shipment id.
pub fn subject(action: &Action) -> &str {
    match action {
        Action::CreateShipment(p) => p.tracking_number.as_str(),
        other => other.shipment_id().unwrap_or("-"),
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One line per queued action: id, stamp, type, subject and retry state.
pub fn format_action_line(queued: &QueuedAction) -> String {
    let mut line = format!(
        "{}  {}  {:<19}  {}",
        queued.id,
        queued.timestamp.format("%Y-%m-%d %H:%M:%S"),
        queued.action_type().as_str(),
        subject(&queued.action),
    );
    if queued.retries > 0 {
        line.push_str(&format!("  (retries: {}", queued.retries));
        if let Some(error) = &queued.last_error {
            line.push_str(&format!(", last error: {}", truncate(error, MAX_ERROR_WIDTH)));
        }
        line.push(')');
    }
    line
}

pub fn format_stats(stats: &StatsView) -> String {
    format!(
        "pending: {}\nprocessing: {}\ndead letters: {}\nlast error: {}",
        stats.pending,
        if stats.processing { "yes" } else { "no" },
        stats.dead_letters,
        stats.last_error.as_deref().unwrap_or("-"),
    )
}

/// Summary for a finished `outbox flush`.
///
/// When actions were given up on, the drain's last delivery error follows on
/// a second line; it is the only trace a dropped action leaves.
pub fn format_flush_outcome(
    outcome: &FlushOutcome,
    pending: usize,
    last_error: Option<&str>,
) -> String {
    match outcome {
        FlushOutcome::Offline => format!("offline: nothing sent ({pending} pending)"),
        FlushOutcome::AlreadyDraining => "a drain is already in progress".to_string(),
        FlushOutcome::Completed(report) if report.attempted == 0 => "nothing to flush".to_string(),
        FlushOutcome::Completed(report) => {
            let mut line = format!(
                "delivered {} of {}, dropped {}",
                report.delivered, report.attempted, report.dropped
            );
            if report.skipped > 0 {
                line.push_str(&format!(", skipped {}", report.skipped));
            }
            if let Some(error) = last_error.filter(|_| report.dropped > 0) {
                line.push_str(&format!("\nlast error: {error}"));
            }
            line
        }
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
