// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The outbox: durable, FIFO-ordered pending actions.
//!
//! [`ActionQueue`] is the only writer of action records. Every store call
//! goes through one mutex, which makes the queue the single serialized seam
//! between callers, the drain loop, and the store. Events are published to
//! the [`SubscriptionHub`] after the lock is released, so subscribers may
//! query the queue from inside a callback.

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::action::{Action, ActionType, QueuedAction};
use crate::clock::{ClockSource, StampClock, SystemClock};
use crate::error::{Error, Result};
use crate::hub::{QueueEvent, Subscription, SubscriptionHub};
use crate::store::{Store, StoredRecord};

/// Collection holding live actions.
pub const ACTIONS: &str = "actions";
/// Collection holding actions that exhausted their retry budget.
pub const DEAD_LETTERS: &str = "dead_letters";

/// Durable FIFO queue of pending actions.
pub struct ActionQueue<S: Store, C: ClockSource = SystemClock> {
    store: Mutex<S>,
    stamps: StampClock<C>,
    hub: Arc<SubscriptionHub>,
}

impl<S: Store> ActionQueue<S, SystemClock> {
    /// Open a queue over the given store using the system clock.
    pub fn new(store: S) -> Result<Self> {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: ClockSource> ActionQueue<S, C> {
    /// Open a queue with a custom clock source.
    ///
    /// Existing records are scanned so new stamps always sort after them.
    pub fn with_clock(store: S, clock: C) -> Result<Self> {
        let stamps = StampClock::with_clock(clock);
        for collection in [ACTIONS, DEAD_LETTERS] {
            for record in store.get_all(collection)? {
                stamps.observe(decode(&record)?.timestamp);
            }
        }

        Ok(ActionQueue {
            store: Mutex::new(store),
            stamps,
            hub: Arc::new(SubscriptionHub::new()),
        })
    }

    fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The hub notified on every queue change.
    pub fn hub(&self) -> &Arc<SubscriptionHub> {
        &self.hub
    }

    /// Shorthand for `hub().subscribe(..)`.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&QueueEvent) + Send + Sync + 'static,
    {
        self.hub.subscribe(callback)
    }

    /// Validate and durably append an action. Returns its new id.
    ///
    /// Returns only after the store acknowledged the write.
    pub fn enqueue(&self, action: Action) -> Result<String> {
        action.validate()?;

        let queued = QueuedAction {
            id: Uuid::new_v4().to_string(),
            action,
            timestamp: self.stamps.next(),
            retries: 0,
            last_error: None,
        };

        {
            let store = self.store();
            if store.get(ACTIONS, &queued.id)?.is_some() {
                return Err(Error::DuplicateAction(queued.id));
            }
            store.put(ACTIONS, &encode(&queued)?)?;
        }

        tracing::debug!(id = %queued.id, action_type = %queued.action_type(), "enqueued action");
        self.hub.notify(&QueueEvent::Enqueued {
            id: queued.id.clone(),
        });
        Ok(queued.id)
    }

    /// Parse an untyped payload for the given type and enqueue it.
    pub fn enqueue_raw(&self, action_type: ActionType, payload: Value) -> Result<String> {
        self.enqueue(Action::from_parts(action_type, payload)?)
    }

    /// Look up a live action by id.
    pub fn get(&self, id: &str) -> Result<Option<QueuedAction>> {
        self.store()
            .get(ACTIONS, id)?
            .map(|record| decode(&record))
            .transpose()
    }

    /// All live actions, oldest first.
    pub fn list_ordered(&self) -> Result<Vec<QueuedAction>> {
        let records = self.store().get_all(ACTIONS)?;
        decode_ordered(&records)
    }

    /// Count a failed delivery attempt against an action.
    ///
    /// Returns the updated action.
    pub fn record_failure(&self, id: &str, error: &str) -> Result<QueuedAction> {
        let store = self.store();
        let record = store
            .get(ACTIONS, id)?
            .ok_or_else(|| Error::ActionNotFound(id.to_string()))?;

        let mut queued = decode(&record)?;
        queued.retries = queued.retries.saturating_add(1);
        queued.last_error = Some(error.to_string());
        store.put(ACTIONS, &encode(&queued)?)?;

        Ok(queued)
    }

    /// Delete an action. Removing an unknown id is not an error.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.store().delete(ACTIONS, id)?;
        self.hub.notify(&QueueEvent::Removed { id: id.to_string() });
        Ok(())
    }

    /// Number of live actions.
    pub fn size(&self) -> Result<usize> {
        self.store().count(ACTIONS)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Delete every live action. Dead letters are kept.
    pub fn clear(&self) -> Result<()> {
        self.store().clear(ACTIONS)?;
        tracing::info!("cleared action queue");
        self.hub.notify(&QueueEvent::Cleared);
        Ok(())
    }

    /// Move an action that exhausted its retries into the dead-letter collection.
    ///
    /// Returns `false` without writing anything if the action is no longer
    /// live, so an action cleared or removed during its last attempt stays gone.
    pub fn dead_letter(&self, queued: &QueuedAction) -> Result<bool> {
        {
            let store = self.store();
            if store.get(ACTIONS, &queued.id)?.is_none() {
                return Ok(false);
            }
            store.move_record(ACTIONS, DEAD_LETTERS, &encode(queued)?)?;
        }
        self.hub.notify(&QueueEvent::Removed {
            id: queued.id.clone(),
        });
        Ok(true)
    }

    /// Dead-lettered actions, oldest first.
    pub fn list_dead_letters(&self) -> Result<Vec<QueuedAction>> {
        let records = self.store().get_all(DEAD_LETTERS)?;
        decode_ordered(&records)
    }

    /// Number of dead-lettered actions.
    pub fn dead_letter_count(&self) -> Result<usize> {
        self.store().count(DEAD_LETTERS)
    }

    /// Put a dead-lettered action back at the tail of the live queue with a
    /// fresh retry budget.
    ///
    /// A live record with the same id (left by a store without atomic moves)
    /// is replaced rather than reported as a duplicate.
    pub fn replay_dead_letter(&self, id: &str) -> Result<QueuedAction> {
        let replayed = {
            let store = self.store();
            let record = store
                .get(DEAD_LETTERS, id)?
                .ok_or_else(|| Error::ActionNotFound(id.to_string()))?;

            let mut queued = decode(&record)?;
            queued.timestamp = self.stamps.next();
            queued.retries = 0;
            queued.last_error = None;

            // Overwrites a live copy with the same id, if one exists.
            store.move_record(DEAD_LETTERS, ACTIONS, &encode(&queued)?)?;
            queued
        };

        tracing::info!(id = %replayed.id, "replayed dead letter");
        self.hub.notify(&QueueEvent::Enqueued {
            id: replayed.id.clone(),
        });
        Ok(replayed)
    }

    /// Delete every dead letter. Returns how many were removed.
    pub fn purge_dead_letters(&self) -> Result<usize> {
        let store = self.store();
        let count = store.count(DEAD_LETTERS)?;
        store.clear(DEAD_LETTERS)?;
        Ok(count)
    }
}

fn encode(queued: &QueuedAction) -> Result<StoredRecord> {
    Ok(StoredRecord {
        key: queued.id.clone(),
        created_at: queued.timestamp.timestamp_micros(),
        data: serde_json::to_string(queued)?,
    })
}

fn decode(record: &StoredRecord) -> Result<QueuedAction> {
    serde_json::from_str(&record.data)
        .map_err(|e| Error::CorruptedData(format!("action '{}': {e}", record.key)))
}

/// Decode and sort by creation stamp. Ties fall back to id so the order is total.
fn decode_ordered(records: &[StoredRecord]) -> Result<Vec<QueuedAction>> {
    let mut actions = records.iter().map(decode).collect::<Result<Vec<_>>>()?;
    actions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    Ok(actions)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
