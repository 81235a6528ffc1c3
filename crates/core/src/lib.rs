// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: offline-first action queue for the shipment service
//!
//! This crate provides the durable queue, the routing table, the transport
//! seam and the drain engine used by the `outbox` CLI. Mutations made while
//! offline are stored as [`QueuedAction`]s and replayed in FIFO order by
//! [`SyncEngine::flush`] once connectivity returns.

pub mod action;
pub mod clock;
pub mod connectivity;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod hub;
pub mod queue;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use action::{Action, ActionType, QueuedAction};
pub use clock::{ClockSource, StampClock, SystemClock};
pub use connectivity::{Connectivity, ConnectivityFlag};
pub use dispatch::{Dispatcher, Route};
pub use engine::{
    Delay, EngineState, FlushOutcome, FlushReport, QueueStats, SyncEngine, SyncOptions,
    TokioDelay,
};
pub use error::{Error, Result};
pub use hub::{QueueEvent, Subscription, SubscriptionHub};
pub use queue::ActionQueue;
pub use store::{MemoryStore, SqliteStore, Store};
pub use transport::{HttpTransport, Method, Request, Transport, TransportError};
