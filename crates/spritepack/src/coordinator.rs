//! At-most-one pack task per group key.
//!
//! Many compilation units resolve concurrently; the first one to reach
//! [`PackTaskCoordinator::get_or_start`] for a key starts the work, and
//! every later caller attaches to the same shared handle instead of
//! re-running it. Success and failure both propagate to all attached
//! callers. Eviction after completion lets a later build occurrence (a
//! freshly discovered resource set) start a new task rather than reuse a
//! stale result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use thiserror::Error;

/// Error shared by every caller attached to a failed pack task.
///
/// Carries a rendered message rather than the source error so the handle can
/// be cloned to an arbitrary number of waiters.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PackTaskError {
    message: String,
}

impl PackTaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for PackTaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Cloneable handle to a (possibly in-flight) pack task's result.
pub type PackHandle<T> = Shared<BoxFuture<'static, Result<Arc<T>, PackTaskError>>>;

/// Registry of in-flight pack tasks, keyed by group key.
#[derive(Debug)]
pub struct PackTaskCoordinator<T> {
    tasks: Mutex<HashMap<String, PackHandle<T>>>,
}

impl<T> Default for PackTaskCoordinator<T> {
    fn default() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Send + Sync + 'static> PackTaskCoordinator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the in-flight handle for `key`, starting `start()` only when
    /// none exists. The work future runs at most once while registered.
    pub fn get_or_start<F>(&self, key: &str, start: impl FnOnce() -> F) -> PackHandle<T>
    where
        F: Future<Output = Result<T, PackTaskError>> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().expect("coordinator lock poisoned");
        if let Some(handle) = tasks.get(key) {
            return handle.clone();
        }

        let work = start();
        let handle = async move { work.await.map(Arc::new) }.boxed().shared();
        tasks.insert(key.to_string(), handle.clone());
        handle
    }

    /// Evict the task registered for `key`. Idempotent; callers evict after
    /// awaiting so the next occurrence of the key starts fresh.
    pub fn finish(&self, key: &str) {
        self.tasks
            .lock()
            .expect("coordinator lock poisoned")
            .remove(key);
    }

    /// Number of currently registered tasks.
    pub fn in_flight(&self) -> usize {
        self.tasks.lock().expect("coordinator lock poisoned").len()
    }
}
