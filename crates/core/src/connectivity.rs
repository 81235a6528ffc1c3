// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline signal consulted at the start of every drain.
//!
//! The monitor only answers the question; it never triggers a drain. Whoever
//! observes the platform's reconnect event is expected to call
//! [`SyncEngine::flush`](crate::engine::SyncEngine::flush).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Synchronous connectivity check.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Externally toggled connectivity flag.
#[derive(Debug)]
pub struct ConnectivityFlag {
    online: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        ConnectivityFlag {
            online: AtomicBool::new(online),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Update the flag. Returns the previous value.
    pub fn set_online(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::online()
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl<C: Connectivity + ?Sized> Connectivity for Arc<C> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
