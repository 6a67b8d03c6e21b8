//! Group completion notification.
//!
//! One notifier per group key lets any number of resolving tasks block until
//! the key is announced complete. Announcements wake the waiters registered
//! at that moment and are not replayed, so waiters always pair the wait with
//! a completeness re-check; [`CompletionBroadcaster::wait_until`] packages
//! that discipline so a wake between check and sleep cannot be lost.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

/// Process-wide-per-session notification channel keyed by group key.
#[derive(Debug, Default)]
pub struct CompletionBroadcaster {
    channels: Mutex<HashMap<String, Arc<Notify>>>,
}

impl CompletionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, key: &str) -> Arc<Notify> {
        let mut channels = self.channels.lock().expect("broadcaster lock poisoned");
        Arc::clone(channels.entry(key.to_string()).or_default())
    }

    /// Announce a key, waking every task currently waiting on it. Waiters on
    /// other keys are unaffected.
    pub fn announce(&self, key: &str) {
        self.channel(key).notify_waiters();
    }

    /// Suspend until `ready()` holds for `key`.
    ///
    /// The notifier is armed before each check, so an announcement landing
    /// between the check and the suspension still wakes the caller.
    pub async fn wait_until(&self, key: &str, mut ready: impl FnMut() -> bool) {
        let notify = self.channel(key);
        loop {
            let notified = notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if ready() {
                return;
            }
            notified.await;
        }
    }
}
