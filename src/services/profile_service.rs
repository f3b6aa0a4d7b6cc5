//! Profile and social link service

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::ownership::fence;
use crate::errors::{LinkhubError, Result};
use crate::storage::{
    AccountStore, Link, LinkStore, NewSocialLink, Profile, ProfileChanges, SocialLink,
    SocialLinkStore, Theme,
};
use crate::utils::generate_id;
use crate::validation::{
    FieldError, PLATFORM_REQUIRED, ProfileFields, SocialLinkFields, normalize_username,
    require_sanitized, sanitize_optional, sanitize_string, trim_url, validate_profile_data,
    validate_social_link_data,
};

/// Partial profile update; inner `None` (or an empty string) clears the column
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub display_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSocialLinkRequest {
    pub platform: Option<String>,
    pub url: Option<String>,
}

/// What a visitor sees at `/{username}`
#[derive(Debug, Clone, Serialize)]
pub struct PublicPage {
    pub profile: Profile,
    pub links: Vec<Link>,
    pub social_links: Vec<SocialLink>,
}

pub struct ProfileService {
    accounts: Arc<dyn AccountStore>,
    links: Arc<dyn LinkStore>,
    social: Arc<dyn SocialLinkStore>,
}

impl ProfileService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        links: Arc<dyn LinkStore>,
        social: Arc<dyn SocialLinkStore>,
    ) -> Self {
        Self {
            accounts,
            links,
            social,
        }
    }

    pub async fn public_page(&self, username: &str) -> Result<PublicPage> {
        let username = normalize_username(username);
        let profile = self
            .accounts
            .find_profile_by_username(&username)
            .await?
            .ok_or_else(|| LinkhubError::not_found("Profile not found"))?;

        let links = self.links.list_active_links(&profile.user_id).await?;
        let social_links = self.social.list_social_links(&profile.user_id).await?;

        Ok(PublicPage {
            profile,
            links,
            social_links,
        })
    }

    pub async fn get_own(&self, user_id: &str) -> Result<Profile> {
        self.accounts
            .find_profile(user_id)
            .await?
            .ok_or_else(|| LinkhubError::not_found("Profile not found"))
    }

    pub async fn update_own(&self, user_id: &str, req: UpdateProfileRequest) -> Result<Profile> {
        let username = req.username.as_deref().map(normalize_username);

        let mut errors = validate_profile_data(&ProfileFields {
            username: username.as_deref(),
            display_name: flatten(&req.display_name),
            bio: flatten(&req.bio),
            avatar_url: flatten(&req.avatar_url),
        });

        let theme = match req.theme.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(_) => {
                    errors.push(FieldError::new("theme", "Theme must be light or dark"));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(LinkhubError::validation(errors));
        }

        let changes = ProfileChanges {
            username,
            display_name: req.display_name.map(|v| sanitize_optional(v.as_deref())),
            bio: req.bio.map(|v| sanitize_optional(v.as_deref())),
            avatar_url: req
                .avatar_url
                .map(|v| v.as_deref().map(trim_url).filter(|s| !s.is_empty())),
            theme,
        };

        let profile = self
            .accounts
            .update_profile(user_id, &changes)
            .await?
            .ok_or_else(|| LinkhubError::not_found("Profile not found"))?;

        info!("Profile updated: {}", profile.username);
        Ok(profile)
    }

    pub async fn list_social(&self, user_id: &str) -> Result<Vec<SocialLink>> {
        self.social.list_social_links(user_id).await
    }

    pub async fn add_social(
        &self,
        user_id: &str,
        req: CreateSocialLinkRequest,
    ) -> Result<SocialLink> {
        let platform = req.platform.unwrap_or_default();
        let url = req.url.unwrap_or_default();

        let mut errors = validate_social_link_data(&SocialLinkFields {
            platform: Some(&platform),
            url: Some(&url),
        });
        let platform = sanitize_string(&platform);
        require_sanitized(&mut errors, "platform", &platform, PLATFORM_REQUIRED);
        if !errors.is_empty() {
            return Err(LinkhubError::validation(errors));
        }

        self.social
            .insert_social_link(NewSocialLink {
                id: generate_id(),
                user_id: user_id.to_string(),
                platform,
                url: trim_url(&url),
            })
            .await
    }

    pub async fn remove_social(&self, user_id: &str, id: &str) -> Result<()> {
        let owned = self.social.list_social_links(user_id).await?;
        fence(owned.into_iter().find(|s| s.id == id), user_id)?;

        if self.social.delete_social_link(user_id, id).await? {
            Ok(())
        } else {
            Err(LinkhubError::not_found("Social link not found"))
        }
    }
}

fn flatten(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(|v| v.as_deref())
}
