//! 用户与个人主页的读写

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use super::converters::{model_to_profile, model_to_user};
use super::{SeaOrmStorage, db_error, is_unique_violation, retry};
use crate::errors::{LinkhubError, Result};
use crate::storage::models::{NewAccount, Profile, ProfileChanges, Theme, User};
use crate::storage::traits::AccountStore;

use migration::entities::{profile, user};

#[async_trait]
impl AccountStore for SeaOrmStorage {
    async fn create_account(&self, account: NewAccount) -> Result<(User, Profile)> {
        let now = Utc::now();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let user_am = user::ActiveModel {
            id: Set(account.user_id.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            created_at: Set(now),
        };
        user::Entity::insert(user_am).exec(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                LinkhubError::conflict("Email already registered")
            } else {
                db_error("Failed to insert user", e)
            }
        })?;

        let profile_am = profile::ActiveModel {
            user_id: Set(account.user_id.clone()),
            username: Set(account.username.clone()),
            display_name: Set(account.display_name.clone()),
            bio: Set(None),
            avatar_url: Set(None),
            theme: Set(Theme::default().as_str().to_string()),
            position_high_water: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        profile::Entity::insert(profile_am)
            .exec(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LinkhubError::conflict("Username already taken")
                } else {
                    db_error("Failed to insert profile", e)
                }
            })?;

        txn.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        info!("Account created: {} ({})", account.user_id, account.username);

        let user = User {
            id: account.user_id.clone(),
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
        };
        let profile = Profile {
            user_id: account.user_id,
            username: account.username,
            display_name: account.display_name,
            bio: None,
            avatar_url: None,
            theme: Theme::default(),
            created_at: now,
            updated_at: now,
        };
        Ok((user, profile))
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("find_user({})", id), self.retry_config, || async {
            user::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map_err(|e| db_error("Failed to query user", e))?;

        Ok(model.map(model_to_user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;

        let model = retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await
        .map_err(|e| db_error("Failed to query user", e))?;

        Ok(model.map(model_to_user))
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let db = &self.db;
        let id_owned = user_id.to_string();

        let model = retry::with_retry(
            &format!("find_profile({})", user_id),
            self.retry_config,
            || async { profile::Entity::find_by_id(id_owned.clone()).one(db).await },
        )
        .await
        .map_err(|e| db_error("Failed to query profile", e))?;

        Ok(model.map(model_to_profile))
    }

    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("find_profile_by_username({})", username),
            self.retry_config,
            || async {
                profile::Entity::find()
                    .filter(profile::Column::Username.eq(username))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| db_error("Failed to query profile", e))?;

        Ok(model.map(model_to_profile))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>> {
        let am = profile::ActiveModel {
            username: changes.username.clone().map_or(NotSet, Set),
            display_name: changes.display_name.clone().map_or(NotSet, Set),
            bio: changes.bio.clone().map_or(NotSet, Set),
            avatar_url: changes.avatar_url.clone().map_or(NotSet, Set),
            theme: changes
                .theme
                .map_or(NotSet, |t| Set(t.as_str().to_string())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = profile::Entity::update_many()
            .set(am)
            .filter(profile::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LinkhubError::conflict("Username already taken")
                } else {
                    db_error("Failed to update profile", e)
                }
            })?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_profile(user_id).await
    }
}
