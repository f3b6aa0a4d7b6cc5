use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{
    Link, LinkChanges, NewAccount, NewLink, NewSocialLink, Profile, ProfileChanges, SocialLink,
    User,
};

/// Persistence seam for links.
///
/// Every write that takes an `owner` is scoped to that owner in the query
/// itself, so a caller that skipped the ownership check still cannot touch a
/// foreign row.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Highest position ever assigned to the owner, deleted links included.
    /// `None` when nothing was ever assigned.
    async fn last_position(&self, owner: &str) -> Result<Option<i64>>;

    /// Fails with `LinkhubError::PositionConflict` when `(owner, position)` is taken.
    async fn insert_link(&self, link: NewLink) -> Result<Link>;

    async fn find_link(&self, id: &str) -> Result<Option<Link>>;

    /// Ordered by position ascending
    async fn list_links(&self, owner: &str) -> Result<Vec<Link>>;

    /// Active links only, ordered by position ascending
    async fn list_active_links(&self, owner: &str) -> Result<Vec<Link>>;

    /// `Ok(None)` when no row matched `(id, owner)`.
    async fn update_link(
        &self,
        owner: &str,
        id: &str,
        changes: &LinkChanges,
    ) -> Result<Option<Link>>;

    /// `Ok(false)` when no row matched `(id, owner)`.
    async fn delete_link(&self, owner: &str, id: &str) -> Result<bool>;

    /// Rewrite positions in one transaction
    async fn assign_positions(&self, owner: &str, assignments: &[(String, i64)]) -> Result<()>;

    /// Adds one click to an active link. `Ok(false)` when missing or inactive.
    async fn increment_click_count(&self, id: &str) -> Result<bool>;
}

/// Users and their profiles. Created together, one profile per user.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `LinkhubError::Conflict` when the email or username is taken.
    async fn create_account(&self, account: NewAccount) -> Result<(User, Profile)>;

    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Emails are stored lowercased; pass the normalized form
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// `Ok(None)` when the user has no profile. A taken username is `Conflict`.
    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>>;
}

#[async_trait]
pub trait SocialLinkStore: Send + Sync {
    async fn list_social_links(&self, user_id: &str) -> Result<Vec<SocialLink>>;

    async fn insert_social_link(&self, link: NewSocialLink) -> Result<SocialLink>;

    /// `Ok(false)` when no row matched `(id, user_id)`.
    async fn delete_social_link(&self, user_id: &str, id: &str) -> Result<bool>;
}
