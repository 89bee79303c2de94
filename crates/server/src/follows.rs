//! Follow-edge operations.
//!
//! A follow edge is unique per (follower, followee) pair and idempotent
//! under re-insertion. Self-follows are rejected at the handler before
//! any statement runs.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::store::Store;

pub struct FollowManager {
    store: Arc<Store>,
}

impl FollowManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Insert-or-update on the unique pair. `None` when the target user
    /// does not exist.
    pub async fn follow(&self, user_id: i64, target_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO follows (user_id, follow_user_id)
            SELECT $1, id FROM users WHERE id = $2
            ON CONFLICT ON CONSTRAINT unique_follow
            DO UPDATE SET follow_user_id = EXCLUDED.follow_user_id
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(self.store.write())
        .await?;

        if row.is_some() {
            info!("[Follows] user {user_id} follows {target_id}");
        }
        Ok(row.map(|(id,)| id))
    }

    /// Remove the edge. `None` when there was nothing to unfollow.
    pub async fn unfollow(&self, user_id: i64, target_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "DELETE FROM follows WHERE user_id = $1 AND follow_user_id = $2 RETURNING id",
        )
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(self.store.write())
        .await?;

        if row.is_some() {
            info!("[Follows] user {user_id} unfollowed {target_id}");
        }
        Ok(row.map(|(id,)| id))
    }
}
