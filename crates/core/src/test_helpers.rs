// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for the core modules.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::action::{Action, NewShipment};
use crate::clock::ClockSource;
use crate::engine::Delay;
use crate::error::{Error, Result};
use crate::store::{Store, StoredRecord};
use crate::transport::{Request, Transport, TransportError, TransportResult};

/// Mock clock for testing with controllable time.
pub struct MockClock {
    micros: AtomicI64,
}

impl MockClock {
    pub fn new(initial_ms: i64) -> Self {
        MockClock {
            micros: AtomicI64::new(initial_ms * 1000),
        }
    }

    pub fn set_ms(&self, ms: i64) {
        self.micros.store(ms * 1000, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.micros.fetch_add(ms * 1000, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_micros(self.micros.load(Ordering::SeqCst)).unwrap()
    }
}

/// Build a create-shipment action with the given tracking number.
pub fn shipment(tracking: &str) -> Action {
    Action::CreateShipment(NewShipment::new(tracking))
}

/// How the mock transport answers a given request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Fail,
}

type SendHook = Box<dyn Fn(usize) + Send>;

/// Mock transport that records every request and answers per path.
///
/// Requests to a path registered with [`MockTransport::fail_path`] are
/// rejected; everything else succeeds.
#[derive(Clone, Default)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<Request>>>,
    failing_paths: Arc<Mutex<Vec<String>>>,
    scripted: Arc<Mutex<VecDeque<Reply>>>,
    on_send: Arc<Mutex<Option<SendHook>>>,
    gate: Option<Gate>,
}

/// Holds a request open until the test releases it.
#[derive(Clone)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every call blocks until `gate.release` is notified.
    pub fn gated() -> (Self, Gate) {
        let gate = Gate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let transport = MockTransport {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (transport, gate)
    }

    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().push(path.to_string());
    }

    /// Queue replies consumed in order before the per-path rules apply.
    pub fn script(&self, replies: &[Reply]) {
        self.scripted.lock().unwrap().extend(replies.iter().copied());
    }

    /// Run `hook` with the 1-based call number on every send, before replying.
    pub fn on_send(&self, hook: impl Fn(usize) + Send + 'static) {
        *self.on_send.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, path: &str) -> usize {
        self.sent().iter().filter(|r| r.path == path).count()
    }

    fn reply_for(&self, request: &Request) -> Reply {
        if let Some(reply) = self.scripted.lock().unwrap().pop_front() {
            return reply;
        }
        if self.failing_paths.lock().unwrap().contains(&request.path) {
            Reply::Fail
        } else {
            Reply::Ok
        }
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: &Request,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move {
            let call = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(request.clone());
                sent.len()
            };
            if let Some(hook) = self.on_send.lock().unwrap().as_ref() {
                hook(call);
            }
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            match self.reply_for(&request) {
                Reply::Ok => Ok(()),
                Reply::Fail => Err(TransportError::Rejected {
                    status: 500,
                    body: format!("mock failure for {}", request.path),
                }),
            }
        })
    }
}

/// Delay that records requested durations and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Delay for RecordingDelay {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.delays.lock().unwrap().push(duration);
        Box::pin(async {})
    }
}

/// Store wrapper that starts failing writes after a number of successful puts.
pub struct FlakyStore<S: Store> {
    inner: S,
    puts_allowed: AtomicUsize,
}

impl<S: Store> FlakyStore<S> {
    pub fn new(inner: S, puts_allowed: usize) -> Self {
        FlakyStore {
            inner,
            puts_allowed: AtomicUsize::new(puts_allowed),
        }
    }

    fn refuse() -> Error {
        Error::Io(std::io::Error::other("disk full"))
    }
}

impl<S: Store> Store for FlakyStore<S> {
    fn put(&self, collection: &str, record: &StoredRecord) -> Result<()> {
        let remaining = self.puts_allowed.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(Self::refuse());
        }
        self.puts_allowed.store(remaining - 1, Ordering::SeqCst);
        self.inner.put(collection, record)
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<StoredRecord>> {
        self.inner.get(collection, key)
    }

    fn get_all(&self, collection: &str) -> Result<Vec<StoredRecord>> {
        self.inner.get_all(collection)
    }

    fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.inner.delete(collection, key)
    }

    fn clear(&self, collection: &str) -> Result<()> {
        self.inner.clear(collection)
    }

    fn count(&self, collection: &str) -> Result<usize> {
        self.inner.count(collection)
    }

    fn move_record(&self, from: &str, to: &str, record: &StoredRecord) -> Result<()> {
        let remaining = self.puts_allowed.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(Self::refuse());
        }
        self.puts_allowed.store(remaining - 1, Ordering::SeqCst);
        self.inner.move_record(from, to, record)
    }
}
