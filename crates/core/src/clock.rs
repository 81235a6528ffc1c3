// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Clock sources and monotonic enqueue stamps.
//!
//! Queue order is defined by the creation timestamp alone, so two actions
//! enqueued within the same clock tick must still receive distinct,
//! increasing stamps. [`StampClock`] guarantees that per queue instance by
//! bumping a non-advancing reading by one microsecond.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation using [`Utc::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: ClockSource> ClockSource for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Generates strictly increasing timestamps from a [`ClockSource`].
///
/// Stamps have microsecond resolution, matching what the store persists.
pub struct StampClock<C: ClockSource = SystemClock> {
    clock: C,
    last_micros: Mutex<i64>,
}

impl StampClock<SystemClock> {
    /// Creates a stamp clock over the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for StampClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> StampClock<C> {
    /// Creates a stamp clock with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        StampClock {
            clock,
            last_micros: Mutex::new(i64::MIN),
        }
    }

    /// Returns the next stamp.
    ///
    /// Never returns a stamp less than or equal to one previously returned or
    /// observed, even if the wall clock stalls or goes backwards.
    pub fn next(&self) -> DateTime<Utc> {
        let physical = self.clock.now().timestamp_micros();
        let mut last = self.last_micros.lock().unwrap_or_else(|e| e.into_inner());

        let micros = if physical > *last {
            physical
        } else {
            last.saturating_add(1)
        };
        *last = micros;

        DateTime::<Utc>::from_timestamp_micros(micros)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Records an existing stamp so later stamps sort after it.
    ///
    /// Used when reopening a queue whose store already holds actions.
    pub fn observe(&self, stamp: DateTime<Utc>) {
        let micros = stamp.timestamp_micros();
        let mut last = self.last_micros.lock().unwrap_or_else(|e| e.into_inner());
        if micros > *last {
            *last = micros;
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
