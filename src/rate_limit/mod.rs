//! Per-identifier fixed-window rate limiting
//!
//! - `RateLimitStore`: the contract any backend must satisfy
//! - `MemoryRateLimiter`: process-local backend (single-instance deployments)
//! - `spawn_sweeper`: background task evicting expired windows
//! - `RateLimitPolicy`: which limit applies to which link operation

mod memory;
mod policy;
mod sweeper;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub use memory::MemoryRateLimiter;
pub use policy::{LinkOperation, RateLimitPolicy, RateLimitRule};
pub use sweeper::spawn_sweeper;

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
}

impl RateLimitDecision {
    pub fn allow(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
        }
    }

    pub fn deny() -> Self {
        Self {
            allowed: false,
            remaining: 0,
        }
    }
}

/// Fixed-window admission.
///
/// For a given identifier:
/// 1. no record, or the window has ended: start a new window with count 1
/// 2. count already at `max_requests`: deny, remaining 0
/// 3. otherwise: count += 1, remaining = `max_requests - count`
///
/// Up to 2x `max_requests` may be admitted across a window boundary.
/// Implementations that read and write the record in separate steps may admit
/// one extra request when two callers both observe `count == max - 1`.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn check(&self, identifier: &str, max_requests: u32, window: Duration)
    -> RateLimitDecision;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
