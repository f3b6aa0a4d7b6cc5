use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::converters::model_to_social_link;
use super::{SeaOrmStorage, db_error, retry};
use crate::errors::Result;
use crate::storage::models::{NewSocialLink, SocialLink};
use crate::storage::traits::SocialLinkStore;

use migration::entities::social_link;

#[async_trait]
impl SocialLinkStore for SeaOrmStorage {
    async fn list_social_links(&self, user_id: &str) -> Result<Vec<SocialLink>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("list_social_links({})", user_id),
            self.retry_config,
            || async {
                social_link::Entity::find()
                    .filter(social_link::Column::UserId.eq(user_id))
                    .order_by_asc(social_link::Column::CreatedAt)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| db_error("Failed to list social links", e))?;

        Ok(models.into_iter().map(model_to_social_link).collect())
    }

    async fn insert_social_link(&self, link: NewSocialLink) -> Result<SocialLink> {
        let now = Utc::now();
        let am = social_link::ActiveModel {
            id: Set(link.id.clone()),
            user_id: Set(link.user_id.clone()),
            platform: Set(link.platform.clone()),
            url: Set(link.url.clone()),
            created_at: Set(now),
        };

        social_link::Entity::insert(am)
            .exec(&self.db)
            .await
            .map_err(|e| db_error("Failed to insert social link", e))?;

        info!("Social link created: {} ({})", link.id, link.platform);

        Ok(SocialLink {
            id: link.id,
            user_id: link.user_id,
            platform: link.platform,
            url: link.url,
            created_at: now,
        })
    }

    async fn delete_social_link(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = social_link::Entity::delete_many()
            .filter(social_link::Column::Id.eq(id))
            .filter(social_link::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("Failed to delete social link", e))?;

        Ok(result.rows_affected > 0)
    }
}
