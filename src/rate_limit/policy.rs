use std::time::Duration;

use crate::config::RateLimitConfig;

/// Link endpoint operations that pass through admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOperation {
    List,
    Create,
    Update,
    Delete,
    Track,
}

impl LinkOperation {
    /// Identifier namespace; keeps reads and writes in separate buckets
    fn key_prefix(self) -> &'static str {
        match self {
            LinkOperation::List => "links-get",
            LinkOperation::Create => "links-post",
            LinkOperation::Update => "links-patch",
            LinkOperation::Delete => "links-delete",
            LinkOperation::Track => "links-track",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub read: RateLimitRule,
    pub write: RateLimitRule,
    pub track: RateLimitRule,
}

impl RateLimitPolicy {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs);
        Self {
            read: RateLimitRule {
                max_requests: config.read_max,
                window,
            },
            write: RateLimitRule {
                max_requests: config.write_max,
                window,
            },
            track: RateLimitRule {
                max_requests: config.track_max,
                window,
            },
        }
    }

    pub fn rule_for(&self, operation: LinkOperation) -> RateLimitRule {
        match operation {
            LinkOperation::List => self.read,
            LinkOperation::Track => self.track,
            LinkOperation::Create | LinkOperation::Update | LinkOperation::Delete => self.write,
        }
    }

    /// `links-post-{subject}` and friends. Subject is a user id, or the client IP for tracking.
    pub fn key_for(operation: LinkOperation, subject: &str) -> String {
        format!("{}-{}", operation.key_prefix(), subject)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.rule_for(LinkOperation::List).max_requests, 100);
        assert_eq!(policy.rule_for(LinkOperation::Create).max_requests, 50);
        assert_eq!(policy.rule_for(LinkOperation::Delete).max_requests, 50);
        assert_eq!(
            policy.rule_for(LinkOperation::Update).window,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_keys_are_namespaced_per_operation() {
        assert_eq!(
            RateLimitPolicy::key_for(LinkOperation::List, "u1"),
            "links-get-u1"
        );
        assert_eq!(
            RateLimitPolicy::key_for(LinkOperation::Create, "u1"),
            "links-post-u1"
        );
        assert_ne!(
            RateLimitPolicy::key_for(LinkOperation::Update, "u1"),
            RateLimitPolicy::key_for(LinkOperation::Delete, "u1")
        );
    }
}
