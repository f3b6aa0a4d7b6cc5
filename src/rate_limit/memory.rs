use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;
use tracing::trace;

use super::{RateLimitDecision, RateLimitStore};

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window limiter.
///
/// The `entry` API holds the shard write lock for the whole
/// read-check-write, so updates to one identifier never interleave.
/// State is lost on restart and is not shared between processes.
#[derive(Debug, Default)]
pub struct MemoryRateLimiter {
    records: DashMap<String, WindowRecord>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_at(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> RateLimitDecision {
        if max_requests == 0 {
            return RateLimitDecision::deny();
        }

        let fresh = WindowRecord {
            count: 1,
            reset_at: now + window,
        };

        match self.records.entry(identifier.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                RateLimitDecision::allow(max_requests - 1)
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if now > record.reset_at {
                    *record = fresh;
                    RateLimitDecision::allow(max_requests - 1)
                } else if record.count >= max_requests {
                    trace!("Rate limit exceeded for '{}'", identifier);
                    RateLimitDecision::deny()
                } else {
                    record.count += 1;
                    RateLimitDecision::allow(max_requests - record.count)
                }
            }
        }
    }

    /// Drop every record whose window has ended. Returns how many were removed.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now <= record.reset_at);
        before.saturating_sub(self.records.len())
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimiter {
    async fn check(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitDecision {
        self.check_at(identifier, max_requests, window, Instant::now())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
