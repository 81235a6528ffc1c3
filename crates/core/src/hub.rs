// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change notifications for queue observers.
//!
//! A UI (or anything else) registers a callback with [`SubscriptionHub::subscribe`]
//! and is called once for every [`QueueEvent`]. Callbacks run on whichever task
//! caused the event, outside the registry lock, so a callback may subscribe or
//! unsubscribe without deadlocking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// A change to the queue's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// An action was durably added.
    Enqueued { id: String },
    /// An action left the queue (delivered, dropped or dead-lettered).
    Removed { id: String },
    /// The queue was emptied administratively.
    Cleared,
    /// A drain began.
    ProcessingStarted,
    /// A drain ended, on any exit path.
    ProcessingStopped,
}

type Callback = Arc<dyn Fn(&QueueEvent) + Send + Sync>;
type Registry = Mutex<BTreeMap<u64, Callback>>;

/// Registry of queue observers.
#[derive(Default)]
pub struct SubscriptionHub {
    next_id: AtomicU64,
    subscribers: Arc<Registry>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked once per queue event.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QueueEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.subscribers).insert(id, Arc::new(callback));
        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Deliver an event to every current subscriber.
    ///
    /// Subscribers added by a callback first hear the next event. A
    /// subscriber unsubscribed by an earlier callback is skipped.
    pub fn notify(&self, event: &QueueEvent) {
        let callbacks: Vec<(u64, Callback)> = lock(&self.subscribers)
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect();
        for (id, callback) in callbacks {
            if lock(&self.subscribers).contains_key(&id) {
                callback(event);
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

fn lock(registry: &Registry) -> std::sync::MutexGuard<'_, BTreeMap<u64, Callback>> {
    registry.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle returned by [`SubscriptionHub::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Stop receiving events. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).remove(&self.id);
        }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| lock(&registry).contains_key(&self.id))
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
