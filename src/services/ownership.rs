//! Ownership fencing
//!
//! Every mutation path checks the loaded resource against the caller before
//! writing. A foreign resource is reported as missing so callers cannot fish
//! for ids that belong to someone else.

use tracing::warn;

use crate::errors::{LinkhubError, Result};
use crate::storage::{Link, SocialLink};

/// A resource that belongs to exactly one user
pub trait Owned {
    const NOT_FOUND: &'static str;

    fn owner_id(&self) -> &str;
    fn resource_id(&self) -> &str;
}

impl Owned for Link {
    const NOT_FOUND: &'static str = "Link not found";

    fn owner_id(&self) -> &str {
        &self.owner
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

impl Owned for SocialLink {
    const NOT_FOUND: &'static str = "Social link not found";

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// `Ok(())` when `caller` owns `resource`, otherwise `NotFound`.
pub fn ensure_owner<T: Owned>(resource: &T, caller: &str) -> Result<()> {
    if resource.owner_id() == caller {
        return Ok(());
    }

    warn!(
        "Ownership check failed: {} does not own {}",
        caller,
        resource.resource_id()
    );
    Err(LinkhubError::not_found(T::NOT_FOUND))
}

/// Fence a lookup result: absent and foreign are the same error.
pub fn fence<T: Owned>(resource: Option<T>, caller: &str) -> Result<T> {
    let resource = resource.ok_or_else(|| LinkhubError::not_found(T::NOT_FOUND))?;
    ensure_owner(&resource, caller)?;
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link_owned_by(owner: &str) -> Link {
        let now = Utc::now();
        Link {
            id: "l1".into(),
            owner: owner.into(),
            title: "t".into(),
            url: "https://a.com".into(),
            description: None,
            position: 1,
            is_active: true,
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_passes() {
        assert!(ensure_owner(&link_owned_by("u1"), "u1").is_ok());
    }

    #[test]
    fn test_foreign_is_not_found() {
        let err = ensure_owner(&link_owned_by("u1"), "u2").unwrap_err();
        assert!(matches!(err, LinkhubError::NotFound(ref m) if m == "Link not found"));
    }

    #[test]
    fn test_fence_absent_and_foreign_match() {
        let absent = fence::<Link>(None, "u2").unwrap_err();
        let foreign = fence(Some(link_owned_by("u1")), "u2").unwrap_err();
        assert_eq!(absent.to_string(), foreign.to_string());
    }

    #[test]
    fn test_social_link_message() {
        let social = SocialLink {
            id: "s1".into(),
            user_id: "u1".into(),
            platform: "github".into(),
            url: "https://github.com/a".into(),
            created_at: Utc::now(),
        };
        let err = ensure_owner(&social, "u2").unwrap_err();
        assert_eq!(err.message(), "Social link not found");
    }
}
