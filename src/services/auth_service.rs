//! Account registration and session issuance

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::jwt::JwtService;
use crate::errors::{LinkhubError, Result};
use crate::storage::{AccountStore, NewAccount, Profile, User};
use crate::utils::generate_id;
use crate::utils::password::{hash_password, verify_password};
use crate::validation::{
    AccountFields, ProfileFields, normalize_username, sanitize_optional, validate_account_data,
    validate_profile_data,
};

#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of the signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: Option<String>,
}

impl UserSummary {
    fn from_parts(user: &User, profile: &Profile) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
        }
    }
}

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: UserSummary,
}

pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, jwt: Arc<JwtService>) -> Self {
        Self { accounts, jwt }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthSession> {
        let email = normalize_email(req.email.as_deref().unwrap_or_default());
        let password = req.password.unwrap_or_default();
        let username = normalize_username(req.username.as_deref().unwrap_or_default());

        let mut errors = validate_account_data(&AccountFields {
            email: Some(&email),
            password: Some(&password),
        });
        errors.extend(validate_profile_data(&ProfileFields {
            username: Some(&username),
            display_name: req.display_name.as_deref(),
            ..Default::default()
        }));
        if !errors.is_empty() {
            return Err(LinkhubError::validation(errors));
        }

        if self.accounts.find_user_by_email(&email).await?.is_some() {
            return Err(LinkhubError::conflict("Email already registered"));
        }
        if self
            .accounts
            .find_profile_by_username(&username)
            .await?
            .is_some()
        {
            return Err(LinkhubError::conflict("Username already taken"));
        }

        let password_hash = hash_password(&password)?;
        let display_name =
            sanitize_optional(req.display_name.as_deref()).or_else(|| Some(username.clone()));

        // 预检查和插入之间仍可能有竞争，唯一索引冲突会在存储层转成 Conflict
        let (user, profile) = self
            .accounts
            .create_account(NewAccount {
                user_id: generate_id(),
                email,
                password_hash,
                username,
                display_name,
            })
            .await?;

        info!("User registered: {}", profile.username);
        self.issue(UserSummary::from_parts(&user, &profile))
    }

    /// Unknown email and wrong password produce the same error
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession> {
        let email = normalize_email(req.email.as_deref().unwrap_or_default());
        let password = req.password.unwrap_or_default();

        let Some(user) = self.accounts.find_user_by_email(&email).await? else {
            // 仍做一次哈希校验，避免通过响应时间区分邮箱是否存在
            let _ = verify_password(&password, dummy_hash());
            warn!("Login failed: unknown email");
            return Err(invalid_credentials());
        };

        let valid = verify_password(&password, &user.password_hash).map_err(|e| {
            error!("Password verification error for {}: {}", user.id, e);
            LinkhubError::internal(e.to_string())
        })?;
        if !valid {
            warn!("Login failed: wrong password for {}", user.id);
            return Err(invalid_credentials());
        }

        let profile = self
            .accounts
            .find_profile(&user.id)
            .await?
            .ok_or_else(|| LinkhubError::internal(format!("User {} has no profile", user.id)))?;

        info!("User logged in: {}", profile.username);
        self.issue(UserSummary::from_parts(&user, &profile))
    }

    /// A token whose user no longer exists is treated as unauthenticated
    pub async fn current_user(&self, user_id: &str) -> Result<UserSummary> {
        let user = self
            .accounts
            .find_user(user_id)
            .await?
            .ok_or_else(|| LinkhubError::unauthorized("Unauthorized"))?;
        let profile = self
            .accounts
            .find_profile(user_id)
            .await?
            .ok_or_else(|| LinkhubError::unauthorized("Unauthorized"))?;

        Ok(UserSummary::from_parts(&user, &profile))
    }

    fn issue(&self, user: UserSummary) -> Result<AuthSession> {
        let token = self.jwt.generate_session_token(&user.id).map_err(|e| {
            error!("Failed to generate session token: {}", e);
            LinkhubError::internal(format!("Failed to generate token: {}", e))
        })?;
        Ok(AuthSession { token, user })
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn invalid_credentials() -> LinkhubError {
    LinkhubError::unauthorized("Invalid credentials")
}

fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("linkhub-timing-equalizer").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_dummy_hash_is_phc() {
        assert!(dummy_hash().starts_with("$argon2"));
    }
}
