//! Request/response bodies for the JSON API

use serde::{Deserialize, Deserializer, Serialize};

use crate::services::{
    CreateLinkRequest, CreateSocialLinkRequest, LoginRequest, RegisterRequest, UpdateLinkRequest,
    UpdateProfileRequest, UserSummary,
};

/// 区分"字段缺失"和"显式 null"：缺失 → None，null → Some(None)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============ Links ============

#[derive(Debug, Deserialize)]
pub struct CreateLinkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl From<CreateLinkBody> for CreateLinkRequest {
    fn from(body: CreateLinkBody) -> Self {
        Self {
            title: body.title,
            url: body.url,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateLinkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl From<UpdateLinkBody> for UpdateLinkRequest {
    fn from(body: UpdateLinkBody) -> Self {
        Self {
            title: body.title,
            url: body.url,
            description: body.description,
            is_active: body.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackBody {
    #[serde(alias = "linkId")]
    pub link_id: String,
}

// ============ Auth ============

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
            username: body.username,
            display_name: body.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<LoginBody> for LoginRequest {
    fn from(body: LoginBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserSummary,
    pub token: String,
}

// ============ Profile ============

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    pub theme: Option<String>,
}

impl From<UpdateProfileBody> for UpdateProfileRequest {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            username: body.username,
            display_name: body.display_name,
            bio: body.bio,
            avatar_url: body.avatar_url,
            theme: body.theme,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSocialLinkBody {
    pub platform: Option<String>,
    pub url: Option<String>,
}

impl From<CreateSocialLinkBody> for CreateSocialLinkRequest {
    fn from(body: CreateSocialLinkBody) -> Self {
        Self {
            platform: body.platform,
            url: body.url,
        }
    }
}

// ============ Health ============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_absent_vs_null() {
        let absent: UpdateLinkBody = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.description, None);

        let null: UpdateLinkBody = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let set: UpdateLinkBody = serde_json::from_str(r#"{"description":"hi"}"#).unwrap();
        assert_eq!(set.description, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_profile_clear_bio() {
        let body: UpdateProfileBody = serde_json::from_str(r#"{"bio":null}"#).unwrap();
        assert_eq!(body.bio, Some(None));
        assert_eq!(body.display_name, None);
    }

    #[test]
    fn test_track_requires_link_id() {
        assert!(serde_json::from_str::<TrackBody>("{}").is_err());
        let camel: TrackBody = serde_json::from_str(r#"{"linkId":"l1"}"#).unwrap();
        assert_eq!(camel.link_id, "l1");
    }
}
