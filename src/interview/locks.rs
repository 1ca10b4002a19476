//! Optional per-session serialization
//!
//! Without locks, concurrent turns on one session are last-writer-wins. With
//! locks, each turn holds its session's mutex from load to upsert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

type LockMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Registry of in-process mutexes keyed by session id
#[derive(Default)]
pub struct SessionLocks {
    locks: Arc<LockMap>,
}

/// Exclusive access to one session; the registry entry is removed on drop
/// once nobody else holds or waits on it
pub struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    session_id: String,
    locks: Arc<LockMap>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let lock = self
            .locks
            .lock()
            .unwrap()
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        SessionGuard {
            guard: Some(lock.lock_owned().await),
            session_id: session_id.to_string(),
            locks: self.locks.clone(),
        }
    }

    /// Number of sessions currently tracked
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // Release the mutex first so only the registry's reference can remain
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap();
        if locks
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.session_id);
        }
    }
}
