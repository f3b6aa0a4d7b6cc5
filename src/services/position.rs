//! Link position allocation
//!
//! `next_position` is a plain read of the owner's position high-water mark, so
//! a position freed by a delete is never handed out again. Two concurrent
//! callers can read the same value; the unique `(user_id, position)` index,
//! the per-owner lock and a single retry in `LinkService::create` close that gap.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::Result;
use crate::storage::LinkStore;

pub struct PositionAllocator {
    store: Arc<dyn LinkStore>,
}

impl PositionAllocator {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// last assigned + 1, or 1 for an owner that never had links
    pub async fn next_position(&self, owner: &str) -> Result<i64> {
        Ok(self
            .store
            .last_position(owner)
            .await?
            .map_or(1, |max| max + 1))
    }
}

/// Per-owner async mutexes; serializes position-changing writes within this process
#[derive(Default)]
pub struct OwnerLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 持有返回的 guard 期间，同一 owner 的其他写入会等待
    pub async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
        // 先克隆 Arc 再 await，避免持有 DashMap 分片锁跨 await
        let lock = self
            .locks
            .entry(owner.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// 清理当前无人持有的锁
    pub fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_owner_is_serialized() {
        let locks = Arc::new(OwnerLocks::new());
        let guard = locks.acquire("u1").await;

        let locks2 = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.acquire("u1").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_owners_do_not_block() {
        let locks = OwnerLocks::new();
        let _a = locks.acquire("u1").await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u2")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_prune_idle_keeps_held_locks() {
        let locks = OwnerLocks::new();
        let held = locks.acquire("u1").await;
        drop(locks.acquire("u2").await);

        assert_eq!(locks.len(), 2);
        assert_eq!(locks.prune_idle(), 1);
        assert_eq!(locks.len(), 1);

        drop(held);
        assert_eq!(locks.prune_idle(), 1);
        assert!(locks.is_empty());
    }
}
