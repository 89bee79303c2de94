//! Post operations: create, delete, lookup, listing, likes, comments.
//!
//! Every operation is a single statement. Check-then-act cases ride on
//! unique constraints with ON CONFLICT clauses, or on INSERT ... SELECT
//! scoped to the target row, never on application-level locking.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::models::{NewPost, PostDetail};
use crate::store::Store;

/// Post body with comment/like aggregates, shared by the single-post
/// lookup and the per-user listing.
const POST_DETAIL_QUERY: &str = r#"
SELECT p.id, p.title, p.content, p.created_at,
       COALESCE(c.comments, '[]'::json) AS comments,
       COALESCE(l.likes, 0) AS likes
FROM posts p
LEFT JOIN (
    SELECT post_id, JSON_AGG(
        json_build_object('comment', comment, 'createdAt', created_at)
        ORDER BY created_at
    ) AS comments
    FROM comments
    GROUP BY post_id
) c ON c.post_id = p.id
LEFT JOIN (
    SELECT post_id, COUNT(*) AS likes
    FROM likes
    GROUP BY post_id
) l ON l.post_id = p.id
"#;

pub struct PostManager {
    store: Arc<Store>,
}

impl PostManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: i64, title: &str, content: &str) -> Result<NewPost> {
        let post = sqlx::query_as::<_, NewPost>(
            r#"
            INSERT INTO posts (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(self.store.write())
        .await?;

        info!("[Posts] user {user_id} created post {}", post.id);
        Ok(post)
    }

    /// Delete scoped to the author. `None` when the post is missing or
    /// owned by someone else; the two cases are indistinguishable on
    /// purpose.
    pub async fn delete(&self, user_id: i64, post_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("DELETE FROM posts WHERE id = $1 AND user_id = $2 RETURNING id")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(self.store.write())
                .await?;

        if row.is_some() {
            info!("[Posts] user {user_id} deleted post {post_id}");
        }
        Ok(row.map(|(id,)| id))
    }

    pub async fn get(&self, post_id: i64) -> Result<Option<PostDetail>> {
        debug!("[Posts] lookup post {post_id}");
        let sql = format!("{POST_DETAIL_QUERY} WHERE p.id = $1");
        let post = sqlx::query_as::<_, PostDetail>(&sql)
            .bind(post_id)
            .fetch_optional(self.store.read())
            .await?;
        Ok(post)
    }

    /// All posts by one author, oldest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<PostDetail>> {
        let sql = format!("{POST_DETAIL_QUERY} WHERE p.user_id = $1 ORDER BY p.created_at");
        let posts = sqlx::query_as::<_, PostDetail>(&sql)
            .bind(user_id)
            .fetch_all(self.store.read())
            .await?;
        Ok(posts)
    }

    /// Idempotent like: a duplicate resolves to an update of the same
    /// edge. `None` when the post does not exist.
    pub async fn like(&self, user_id: i64, post_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO likes (user_id, post_id)
            SELECT $1, id FROM posts WHERE id = $2
            ON CONFLICT ON CONSTRAINT unique_like
            DO UPDATE SET post_id = EXCLUDED.post_id
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(self.store.write())
        .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Remove a like edge. `None` when there was nothing to unlike.
    pub async fn unlike(&self, user_id: i64, post_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("DELETE FROM likes WHERE user_id = $1 AND post_id = $2 RETURNING id")
                .bind(user_id)
                .bind(post_id)
                .fetch_optional(self.store.write())
                .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Insert a comment scoped to an existing post. `None` when the post
    /// does not exist.
    pub async fn comment(&self, user_id: i64, post_id: i64, comment: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO comments (user_id, post_id, comment)
            SELECT $1, id, $2 FROM posts WHERE id = $3
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(comment)
        .bind(post_id)
        .fetch_optional(self.store.write())
        .await?;
        Ok(row.map(|(id,)| id))
    }
}
