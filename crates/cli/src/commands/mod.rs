// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod dead_letters;
pub mod enqueue;
pub mod flush;
pub mod list;
pub mod stats;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use outbox_core::{
    ActionQueue, ConnectivityFlag, HttpTransport, SqliteStore, Store, SyncEngine,
};

use crate::config::{self, Config};
use crate::error::Result;

/// Queue type used by every command.
pub type Queue = ActionQueue<SqliteStore>;

/// Engine type used by the delivering commands.
pub type Engine = SyncEngine<SqliteStore, HttpTransport>;

/// Resolved state directory and configuration for one invocation.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Resolve the state directory and load its configuration.
    pub fn load(state_dir: Option<PathBuf>) -> Result<Self> {
        let state_dir = config::state_dir(state_dir)?;
        let config = Config::load(&state_dir)?;
        Ok(Context { state_dir, config })
    }

    /// Open (creating if needed) the queue database.
    pub fn open_queue(&self) -> Result<Arc<Queue>> {
        let store = SqliteStore::open(&config::db_path(&self.state_dir))?;
        Ok(Arc::new(ActionQueue::new(store)?))
    }

    /// Build an engine over `queue` that delivers to the configured service.
    pub fn engine(&self, queue: Arc<Queue>, online: bool) -> Result<Engine> {
        let remote = &self.config.remote;
        let transport = HttpTransport::new(
            &remote.base_url,
            remote.timeout(),
            remote.session_cookie.clone(),
        )?;
        Ok(SyncEngine::new(
            queue,
            transport,
            Arc::new(ConnectivityFlag::new(online)),
            self.config.sync.options(),
        ))
    }

    /// Take the cross-process drain lock, or `None` if another process has it.
    pub fn try_lock_drain(&self) -> Result<Option<DrainLock>> {
        DrainLock::try_acquire(config::lock_path(&self.state_dir))
    }
}

/// Exclusive advisory lock held for the duration of a drain.
///
/// The engine is single-flight within a process; this extends that to
/// concurrent `outbox` invocations sharing a state directory. Released when
/// dropped.
pub struct DrainLock {
    _file: File,
}

impl DrainLock {
    fn try_acquire(path: PathBuf) -> Result<Option<Self>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(DrainLock { _file: file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Error stored on the most recently enqueued action that has one, live or
/// dead-lettered.
///
/// Records keep no failure time, so this follows enqueue order: an older
/// action that failed later does not win.
pub(crate) fn newest_action_error<S: Store>(queue: &ActionQueue<S>) -> Result<Option<String>> {
    let mut failed: Vec<_> = queue
        .list_ordered()?
        .into_iter()
        .chain(queue.list_dead_letters()?)
        .filter(|a| a.last_error.is_some())
        .collect();
    failed.sort_by_key(|a| a.timestamp);
    Ok(failed.pop().and_then(|a| a.last_error))
}

/// Single-threaded runtime for the commands that talk to the network.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
