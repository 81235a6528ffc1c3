// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The drain loop.
//!
//! [`SyncEngine::flush`] replays the outbox against the remote service:
//!
//! 1. Offline: return [`FlushOutcome::Offline`] without touching anything.
//! 2. Another drain in flight: return [`FlushOutcome::AlreadyDraining`].
//! 3. Take the drain guard and snapshot the queue in FIFO order. Actions
//!    enqueued after this point wait for the next drain.
//! 4. Deliver each snapshot entry in turn. A failed attempt sleeps
//!    `base_delay * 2^retries`, records the failure and retries the same
//!    action in place. Once `max_retries` attempts have failed the action is
//!    dropped (or dead-lettered) and the drain moves on to the next one.
//!
//! Deliveries are strictly sequential. Delivery failures never escape
//! `flush`; only store errors do, and the guard is released on every path.

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::action::{Action, QueuedAction};
use crate::clock::{ClockSource, SystemClock};
use crate::connectivity::Connectivity;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::hub::{QueueEvent, Subscription, SubscriptionHub};
use crate::queue::ActionQueue;
use crate::store::Store;
use crate::transport::Transport;

/// Retry and dead-letter policy for a drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Total delivery attempts per action, including the first.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each later one.
    pub base_delay: Duration,
    /// Keep actions that exhaust their retries in the dead-letter collection
    /// instead of discarding them.
    pub dead_letter: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            dead_letter: false,
        }
    }
}

impl SyncOptions {
    /// Delay before retrying an action that has failed `retries` times.
    pub fn backoff(&self, retries: u32) -> Duration {
        let factor = 2u32.checked_pow(retries).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Sleeps between retries.
///
/// Injectable so tests can observe the backoff sequence without waiting.
pub trait Delay: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// [`Delay`] backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Whether a drain is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Draining,
}

/// Point-in-time view of the queue for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub pending: usize,
    pub processing: bool,
    pub last_error: Option<String>,
}

/// What one drain did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Actions in the snapshot.
    pub attempted: usize,
    /// Actions the service accepted.
    pub delivered: usize,
    /// Actions given up on after exhausting their retries.
    pub dropped: usize,
    /// Snapshot entries removed by someone else before their turn.
    pub skipped: usize,
}

/// Result of a call to [`SyncEngine::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Connectivity reported offline; nothing was done.
    Offline,
    /// A drain was already in flight; this call was a no-op.
    AlreadyDraining,
    /// The snapshot was fully processed.
    Completed(FlushReport),
}

enum Delivery {
    Delivered,
    Dropped,
    Vanished,
}

/// Scoped single-flight lock for a drain.
///
/// Acquiring announces [`QueueEvent::ProcessingStarted`]; dropping releases
/// the flag and announces [`QueueEvent::ProcessingStopped`], whichever way
/// the drain exits.
struct DrainGuard<'a> {
    flag: &'a AtomicBool,
    hub: &'a SubscriptionHub,
}

impl<'a> DrainGuard<'a> {
    fn acquire(flag: &'a AtomicBool, hub: &'a SubscriptionHub) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        hub.notify(&QueueEvent::ProcessingStarted);
        Some(DrainGuard { flag, hub })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.hub.notify(&QueueEvent::ProcessingStopped);
    }
}

/// Drives delivery of queued actions.
pub struct SyncEngine<S: Store, T: Transport, C: ClockSource = SystemClock> {
    queue: Arc<ActionQueue<S, C>>,
    transport: T,
    connectivity: Arc<dyn Connectivity>,
    dispatcher: Dispatcher,
    delay: Arc<dyn Delay>,
    options: SyncOptions,
    draining: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl<S: Store, T: Transport, C: ClockSource> SyncEngine<S, T, C> {
    pub fn new(
        queue: Arc<ActionQueue<S, C>>,
        transport: T,
        connectivity: Arc<dyn Connectivity>,
        options: SyncOptions,
    ) -> Self {
        SyncEngine {
            queue,
            transport,
            connectivity,
            dispatcher: Dispatcher::new(),
            delay: Arc::new(TokioDelay),
            options,
            draining: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Replace the retry sleeper.
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the routing table.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn queue(&self) -> &Arc<ActionQueue<S, C>> {
        &self.queue
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn state(&self) -> EngineState {
        if self.is_processing() {
            EngineState::Draining
        } else {
            EngineState::Idle
        }
    }

    pub fn is_processing(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Enqueue an action. See [`ActionQueue::enqueue`].
    pub fn enqueue(&self, action: Action) -> Result<String> {
        self.queue.enqueue(action)
    }

    /// Subscribe to queue events, including drain start/stop.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QueueEvent) + Send + Sync + 'static,
    {
        self.queue.subscribe(callback)
    }

    /// Empty the live queue.
    pub fn clear(&self) -> Result<()> {
        self.queue.clear()
    }

    pub fn stats(&self) -> Result<QueueStats> {
        Ok(QueueStats {
            pending: self.queue.size()?,
            processing: self.is_processing(),
            last_error: self.last_error(),
        })
    }

    /// Most recent delivery failure seen by this engine.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_last_error(&self, message: &str) {
        *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    /// Run one drain. See the module docs for the algorithm.
    pub async fn flush(&self) -> Result<FlushOutcome> {
        if !self.connectivity.is_online() {
            tracing::debug!("offline, skipping drain");
            return Ok(FlushOutcome::Offline);
        }

        let Some(_guard) = DrainGuard::acquire(&self.draining, self.queue.hub()) else {
            tracing::debug!("drain already in progress");
            return Ok(FlushOutcome::AlreadyDraining);
        };

        let snapshot = self.queue.list_ordered()?;
        let mut report = FlushReport {
            attempted: snapshot.len(),
            ..FlushReport::default()
        };

        for action in snapshot {
            match self.deliver(action).await? {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Dropped => report.dropped += 1,
                Delivery::Vanished => report.skipped += 1,
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                attempted = report.attempted,
                delivered = report.delivered,
                dropped = report.dropped,
                skipped = report.skipped,
                "drain finished"
            );
        }
        Ok(FlushOutcome::Completed(report))
    }

    /// Deliver one action, retrying in place until it succeeds or its
    /// budget is spent.
    async fn deliver(&self, mut action: QueuedAction) -> Result<Delivery> {
        // The snapshot may be stale: a clear() or remove() since it was taken wins.
        if self.queue.get(&action.id)?.is_none() {
            return Ok(Delivery::Vanished);
        }

        loop {
            let attempt = match self.dispatcher.resolve(&action.action) {
                Ok(request) => {
                    tracing::debug!(
                        id = %action.id,
                        method = %request.method,
                        path = %request.path,
                        attempt = action.retries + 1,
                        "delivering action"
                    );
                    self.transport
                        .send(&request)
                        .await
                        .map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            };

            let message = match attempt {
                Ok(()) => {
                    self.queue.remove(&action.id)?;
                    return Ok(Delivery::Delivered);
                }
                Err(message) => message,
            };
            self.set_last_error(&message);

            if action.retries + 1 < self.options.max_retries {
                let wait = self.options.backoff(action.retries);
                tracing::debug!(id = %action.id, error = %message, ?wait, "delivery failed, backing off");
                self.delay.sleep(wait).await;

                action = match self.queue.record_failure(&action.id, &message) {
                    Ok(updated) => updated,
                    Err(crate::Error::ActionNotFound(_)) => return Ok(Delivery::Vanished),
                    Err(e) => return Err(e),
                };
                continue;
            }

            tracing::warn!(
                id = %action.id,
                action_type = %action.action_type(),
                attempts = action.retries + 1,
                error = %message,
                "giving up on action"
            );
            if self.options.dead_letter {
                action.retries += 1;
                action.last_error = Some(message);
                if !self.queue.dead_letter(&action)? {
                    return Ok(Delivery::Vanished);
                }
            } else {
                self.queue.remove(&action.id)?;
            }
            return Ok(Delivery::Dropped);
        }
    }

    /// Flush every `period` until `shutdown` resolves.
    ///
    /// Errors from individual drains are logged and the loop keeps going.
    pub async fn run_every<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.flush().await {
                        tracing::error!("drain failed: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
