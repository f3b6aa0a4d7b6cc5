//! Input validation and sanitization
//!
//! Validators are pure and presence-driven: only the fields present in the
//! candidate record are checked, and every failing field is reported.

mod fields;
mod sanitizer;
mod urls;

use serde::{Deserialize, Serialize};

pub use fields::{
    AccountFields, LinkFields, PLATFORM_REQUIRED, ProfileFields, SocialLinkFields, TITLE_REQUIRED,
    is_valid_email, is_valid_username, normalize_username, require_sanitized,
    validate_account_data, validate_link_data, validate_profile_data, validate_social_link_data,
};
pub use sanitizer::{sanitize_optional, sanitize_string, trim_url};
pub use urls::{UrlValidationError, is_valid_url, validate_url};

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
