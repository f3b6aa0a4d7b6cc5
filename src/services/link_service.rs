//! Link management service
//!
//! Owns the rules around a user's links: admission through the rate limiter,
//! validation and sanitization, ownership fencing, position allocation and
//! click tracking. HTTP handlers only translate requests into these calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use super::ownership::fence;
use super::position::{OwnerLocks, PositionAllocator};
use crate::errors::{LinkhubError, Result};
use crate::rate_limit::{LinkOperation, RateLimitPolicy, RateLimitStore};
use crate::storage::{Link, LinkChanges, LinkStore, NewLink};
use crate::utils::generate_id;
use crate::validation::{
    FieldError, LinkFields, TITLE_REQUIRED, require_sanitized, sanitize_optional, sanitize_string,
    trim_url, validate_link_data,
};

// ============ Request DTOs ============

/// Create input; missing title/url are treated as empty strings
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// Partial update. `description: Some(None)` or `Some(Some(""))` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateLinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

// ============ Service ============

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    limiter: Arc<dyn RateLimitStore>,
    policy: RateLimitPolicy,
    positions: PositionAllocator,
    locks: OwnerLocks,
}

impl LinkService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        limiter: Arc<dyn RateLimitStore>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            positions: PositionAllocator::new(store.clone()),
            store,
            limiter,
            policy,
            locks: OwnerLocks::new(),
        }
    }

    /// Charge one request against `subject`'s bucket for `operation`.
    ///
    /// Returns the remaining budget, or `RateLimited`.
    pub async fn admit(&self, operation: LinkOperation, subject: &str) -> Result<u32> {
        let rule = self.policy.rule_for(operation);
        let key = RateLimitPolicy::key_for(operation, subject);

        let decision = self
            .limiter
            .check(&key, rule.max_requests, rule.window)
            .await;

        if decision.allowed {
            Ok(decision.remaining)
        } else {
            warn!("Rate limit exceeded: {}", key);
            Err(LinkhubError::rate_limited())
        }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Link>> {
        self.store.list_links(owner).await
    }

    pub async fn create(&self, owner: &str, req: CreateLinkRequest) -> Result<Link> {
        let title = req.title.unwrap_or_default();
        let url = req.url.unwrap_or_default();

        let mut errors = validate_link_data(&LinkFields {
            title: Some(&title),
            url: Some(&url),
            description: req.description.as_deref(),
        });
        let title = sanitize_string(&title);
        require_sanitized(&mut errors, "title", &title, TITLE_REQUIRED);
        if !errors.is_empty() {
            return Err(LinkhubError::validation(errors));
        }

        let url = trim_url(&url);
        let description = sanitize_optional(req.description.as_deref());
        let id = generate_id();

        let _guard = self.locks.acquire(owner).await;

        // 另一个进程可能在我们读取最大值之后抢占了同一位置，重读后只再试一次
        let mut retried = false;
        loop {
            let position = self.positions.next_position(owner).await?;
            let new_link = NewLink {
                id: id.clone(),
                owner: owner.to_string(),
                title: title.clone(),
                url: url.clone(),
                description: description.clone(),
                position,
            };

            match self.store.insert_link(new_link).await {
                Ok(link) => return Ok(link),
                Err(LinkhubError::PositionConflict(msg)) if !retried => {
                    warn!(
                        "Position conflict for owner {} ({}), retrying once",
                        owner, msg
                    );
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn update(&self, owner: &str, link_id: &str, req: UpdateLinkRequest) -> Result<Link> {
        let mut errors = validate_link_data(&LinkFields {
            title: req.title.as_deref(),
            url: req.url.as_deref(),
            description: req.description.as_ref().and_then(|d| d.as_deref()),
        });
        let title = req.title.as_deref().map(sanitize_string);
        if let Some(title) = &title {
            require_sanitized(&mut errors, "title", title, TITLE_REQUIRED);
        }
        if !errors.is_empty() {
            return Err(LinkhubError::validation(errors));
        }

        fence(self.store.find_link(link_id).await?, owner)?;

        let changes = LinkChanges {
            title,
            url: req.url.as_deref().map(trim_url),
            description: req.description.map(|d| sanitize_optional(d.as_deref())),
            is_active: req.is_active,
        };

        self.store
            .update_link(owner, link_id, &changes)
            .await?
            .ok_or_else(|| LinkhubError::not_found("Link not found"))
    }

    pub async fn toggle_active(&self, owner: &str, link_id: &str) -> Result<Link> {
        let link = fence(self.store.find_link(link_id).await?, owner)?;

        let changes = LinkChanges {
            is_active: Some(!link.is_active),
            ..Default::default()
        };

        self.store
            .update_link(owner, link_id, &changes)
            .await?
            .ok_or_else(|| LinkhubError::not_found("Link not found"))
    }

    /// 删除后不重新编号，位置可以有空洞
    pub async fn delete(&self, owner: &str, link_id: &str) -> Result<()> {
        fence(self.store.find_link(link_id).await?, owner)?;

        if self.store.delete_link(owner, link_id).await? {
            Ok(())
        } else {
            Err(LinkhubError::not_found("Link not found"))
        }
    }

    /// Rewrite display order.
    ///
    /// `ordered_ids` must name each of the owner's links exactly once. New
    /// positions start above the high-water mark so the unique index never
    /// sees a transient duplicate and no earlier value comes back.
    pub async fn reorder(&self, owner: &str, ordered_ids: &[String]) -> Result<Vec<Link>> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        if let Some(dup) = ordered_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(LinkhubError::validation(vec![FieldError::new(
                "ids",
                format!("Duplicate link id: {}", dup),
            )]));
        }

        let _guard = self.locks.acquire(owner).await;

        let owned = self.store.list_links(owner).await?;
        let by_id: HashMap<&str, &Link> = owned.iter().map(|l| (l.id.as_str(), l)).collect();

        for id in ordered_ids {
            let link = by_id.get(id.as_str()).copied().cloned();
            fence(link, owner)?;
        }

        if ordered_ids.len() != owned.len() {
            return Err(LinkhubError::validation(vec![FieldError::new(
                "ids",
                "Must include every link exactly once",
            )]));
        }

        let first = self.positions.next_position(owner).await?;
        let assignments: Vec<(String, i64)> = ordered_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), first + i as i64))
            .collect();

        self.store.assign_positions(owner, &assignments).await?;
        info!("Links reordered for owner {}", owner);

        self.store.list_links(owner).await
    }

    /// Public click tracking; only active links count
    pub async fn track(&self, link_id: &str) -> Result<()> {
        if self.store.increment_click_count(link_id).await? {
            Ok(())
        } else {
            Err(LinkhubError::not_found("Link not found"))
        }
    }

    /// Drop per-owner locks nobody holds
    pub fn prune_locks(&self) -> usize {
        self.locks.prune_idle()
    }
}
