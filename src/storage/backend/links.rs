//! LinkStore implementation for SeaOrmStorage

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ExprTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

use super::converters::{changes_to_active_model, model_to_link, new_link_to_active_model};
use super::{SeaOrmStorage, db_error, is_unique_violation, retry};
use crate::errors::{LinkhubError, Result};
use crate::storage::models::{Link, LinkChanges, NewLink};
use crate::storage::traits::LinkStore;

use migration::entities::{link, profile};

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn last_position(&self, owner: &str) -> Result<Option<i64>> {
        let db = &self.db;

        let (top, mark) = retry::with_retry(
            &format!("last_position({})", owner),
            self.retry_config,
            || async {
                let top = link::Entity::find()
                    .filter(link::Column::UserId.eq(owner))
                    .order_by_desc(link::Column::Position)
                    .limit(1)
                    .one(db)
                    .await?;
                let mark = profile::Entity::find_by_id(owner.to_string()).one(db).await?;
                Ok::<_, DbErr>((top, mark))
            },
        )
        .await
        .map_err(|e| db_error("Failed to query last position", e))?;

        // 高水位为 0 表示从未分配过
        let mark = mark
            .map(|p| p.position_high_water)
            .filter(|&m| m > 0);
        Ok(std::cmp::Ord::max(top.map(|m| m.position), mark))
    }

    async fn insert_link(&self, new_link: NewLink) -> Result<Link> {
        let now = Utc::now();
        let am = new_link_to_active_model(&new_link, now);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // 插入不重试：唯一约束冲突要原样交给调用方，txn 在 drop 时回滚
        match link::Entity::insert(am).exec(&txn).await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                debug!(
                    "Position {} already taken for owner {}",
                    new_link.position, new_link.owner
                );
                return Err(LinkhubError::position_conflict(format!(
                    "position {} is taken",
                    new_link.position
                )));
            }
            Err(e) => {
                return Err(db_error("Failed to insert link", e));
            }
        }

        raise_high_water(&txn, &new_link.owner, new_link.position)
            .await
            .map_err(|e| db_error("Failed to raise position high-water mark", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        info!("Link created: {} (owner {})", new_link.id, new_link.owner);

        Ok(Link {
            id: new_link.id,
            owner: new_link.owner,
            title: new_link.title,
            url: new_link.url,
            description: new_link.description,
            position: new_link.position,
            is_active: true,
            click_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_link(&self, id: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("find_link({})", id), self.retry_config, || async {
            link::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map_err(|e| db_error("Failed to query link", e))?;

        Ok(model.map(model_to_link))
    }

    async fn list_links(&self, owner: &str) -> Result<Vec<Link>> {
        let db = &self.db;

        let models = retry::with_retry(&format!("list_links({})", owner), self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::UserId.eq(owner))
                .order_by_asc(link::Column::Position)
                .all(db)
                .await
        })
        .await
        .map_err(|e| db_error("Failed to list links", e))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn list_active_links(&self, owner: &str) -> Result<Vec<Link>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("list_active_links({})", owner),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::UserId.eq(owner))
                    .filter(link::Column::IsActive.eq(true))
                    .order_by_asc(link::Column::Position)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| db_error("Failed to list active links", e))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn update_link(
        &self,
        owner: &str,
        id: &str,
        changes: &LinkChanges,
    ) -> Result<Option<Link>> {
        let am = changes_to_active_model(changes, Utc::now());

        let result = link::Entity::update_many()
            .set(am)
            .filter(link::Column::Id.eq(id))
            .filter(link::Column::UserId.eq(owner))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("Failed to update link", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        debug!("Link updated: {}", id);
        self.find_link(id).await
    }

    async fn delete_link(&self, owner: &str, id: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_link({})", id), self.retry_config, || async {
            link::Entity::delete_many()
                .filter(link::Column::Id.eq(id))
                .filter(link::Column::UserId.eq(owner))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| db_error("Failed to delete link", e))?;

        if result.rows_affected > 0 {
            info!("Link deleted: {} (owner {})", id, owner);
        }
        Ok(result.rows_affected > 0)
    }

    async fn assign_positions(&self, owner: &str, assignments: &[(String, i64)]) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let now = Utc::now();
        for (id, position) in assignments {
            let result = link::Entity::update_many()
                .col_expr(link::Column::Position, Expr::value(*position))
                .col_expr(link::Column::UpdatedAt, Expr::value(now))
                .filter(link::Column::Id.eq(id.as_str()))
                .filter(link::Column::UserId.eq(owner))
                .exec(&txn)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        LinkhubError::position_conflict(format!("position {} is taken", position))
                    } else {
                        db_error("Failed to update link position", e)
                    }
                })?;

            // txn 在 drop 时回滚
            if result.rows_affected == 0 {
                return Err(LinkhubError::not_found("Link not found"));
            }
        }

        if let Some(top) = assignments.iter().map(|(_, position)| *position).max() {
            raise_high_water(&txn, owner, top)
                .await
                .map_err(|e| db_error("Failed to raise position high-water mark", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        info!(
            "Reordered {} links for owner {}",
            assignments.len(),
            owner
        );
        Ok(())
    }

    async fn increment_click_count(&self, id: &str) -> Result<bool> {
        let result = link::Entity::update_many()
            .col_expr(
                link::Column::ClickCount,
                Expr::col(link::Column::ClickCount).add(1i64),
            )
            .filter(link::Column::Id.eq(id))
            .filter(link::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("Failed to increment click count", e))?;

        Ok(result.rows_affected > 0)
    }
}

/// 只增不减：新位置不高于当前高水位时不写
async fn raise_high_water<C: ConnectionTrait>(
    conn: &C,
    owner: &str,
    position: i64,
) -> std::result::Result<(), DbErr> {
    profile::Entity::update_many()
        .col_expr(profile::Column::PositionHighWater, Expr::value(position))
        .filter(profile::Column::UserId.eq(owner))
        .filter(profile::Column::PositionHighWater.lt(position))
        .exec(conn)
        .await?;
    Ok(())
}
