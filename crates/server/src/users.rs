//! User identity operations: credential check, lookup, profile.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{Profile, User};
use crate::store::Store;

pub struct UserManager {
    store: Arc<Store>,
}

impl UserManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Check an email/password pair against the stored bcrypt hash.
    /// `None` means the pair matches no user; the caller decides how
    /// that surfaces.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.store.read())
        .await?;

        let Some((id, user_name, email, password_hash)) = row else {
            return Ok(None);
        };

        let valid =
            bcrypt::verify(password, &password_hash).context("failed to verify password")?;
        if !valid {
            warn!("[Auth] failed login attempt for user {id}");
            return Ok(None);
        }

        info!("[Auth] user {id} authenticated");
        Ok(Some(User {
            id,
            user_name,
            email,
        }))
    }

    /// Resolve an id to its user row, if the account still exists.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, user_name, email FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(self.store.read())
                .await?;
        Ok(user)
    }

    /// Profile with follower/following counts.
    pub async fn profile(&self, id: i64) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT
                id, user_name,
                (SELECT COUNT(*) FROM follows WHERE user_id = $1) AS following,
                (SELECT COUNT(*) FROM follows WHERE follow_user_id = $1) AS followers
            FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.store.read())
        .await?;
        Ok(profile)
    }
}
