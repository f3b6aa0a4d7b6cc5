//! Service layer for business logic
//!
//! HTTP handlers call into these services; storage and rate limiting are
//! injected as trait objects so tests can swap them.

mod auth_service;
mod link_service;
pub mod ownership;
pub mod position;
mod profile_service;

pub use auth_service::{
    AuthService, AuthSession, LoginRequest, RegisterRequest, UserSummary, normalize_email,
};
pub use link_service::{CreateLinkRequest, LinkService, UpdateLinkRequest};
pub use ownership::{Owned, ensure_owner, fence};
pub use position::{OwnerLocks, PositionAllocator};
pub use profile_service::{
    CreateSocialLinkRequest, ProfileService, PublicPage, UpdateProfileRequest,
};
