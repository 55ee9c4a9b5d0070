// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread mutual exclusion for turn processing.
//!
//! Turns on the same thread id queue behind one async mutex; different
//! threads never contend. Entries exist only while some turn holds or waits
//! for them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

#[derive(Debug, Default, Clone)]
pub struct ThreadLocks {
    table: Arc<LockTable>,
}

impl ThreadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn holds `thread_id`.
    ///
    /// Waiters are served in FIFO order (tokio mutex fairness).
    pub async fn acquire(&self, thread_id: &str) -> ThreadGuard {
        let mutex = self
            .table
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        ThreadGuard {
            guard: Some(guard),
            thread_id: thread_id.to_string(),
            table: Arc::clone(&self.table),
        }
    }

    /// Number of thread ids currently held or awaited.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Held for the duration of one turn. Dropping it releases the thread and
/// removes the table entry if nobody else is waiting.
pub struct ThreadGuard {
    guard: Option<OwnedMutexGuard<()>>,
    thread_id: String,
    table: Arc<LockTable>,
}

impl ThreadGuard {
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        // Release first so the guard's Arc no longer counts as a holder.
        drop(self.guard.take());
        self.table
            .remove_if(&self.thread_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn entry_is_removed_after_release() {
        let locks = ThreadLocks::new();
        let guard = locks.acquire("t1").await;
        assert_eq!(locks.len(), 1);
        assert_eq!(guard.thread_id(), "t1");
        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_threads_do_not_block() {
        let locks = ThreadLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b")).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn same_thread_waits_for_holder() {
        let locks = ThreadLocks::new();
        let first = locks.acquire("t").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("t")).await;
        assert!(blocked.is_err());

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire("t").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn waiter_keeps_entry_alive_when_holder_releases() {
        let locks = ThreadLocks::new();
        let first = locks.acquire("t").await;

        let (tx, rx) = tokio::sync::oneshot::channel();
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let guard = locks.acquire("t").await;
                let _ = rx.await;
                drop(guard);
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(locks.len(), 1);

        tx.send(()).unwrap();
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
