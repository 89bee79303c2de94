//! Relational storage layer.
//!
//! Two independently pooled connection sets against the same Postgres
//! database: a read role and a write role. Read-only endpoints cannot
//! execute mutations even if the read credential leaks. Every statement
//! binds every value, identifiers included.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::StoreConfig;

pub struct Store {
    read: PgPool,
    write: PgPool,
}

impl Store {
    /// Establish both pools and verify connectivity. A failure here is
    /// fatal to startup.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let read = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options(&config.read_user, &config.read_password))
            .await
            .context("failed to establish the read pool")?;
        sqlx::query("SELECT 1")
            .execute(&read)
            .await
            .context("read pool failed its startup ping")?;
        info!("[Store] read pool established");

        let write = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options(&config.write_user, &config.write_password))
            .await
            .context("failed to establish the write pool")?;
        sqlx::query("SELECT 1")
            .execute(&write)
            .await
            .context("write pool failed its startup ping")?;
        info!("[Store] write pool established");

        Ok(Self { read, write })
    }

    /// Wrap pre-built pools. Lets tests drive the router over pools that
    /// never connect.
    pub fn from_pools(read: PgPool, write: PgPool) -> Self {
        Self { read, write }
    }

    /// Pool for SELECT-only statements.
    pub fn read(&self) -> &PgPool {
        &self.read
    }

    /// Pool for mutating statements.
    pub fn write(&self) -> &PgPool {
        &self.write
    }

    /// Create any missing tables. Runs on the write pool, which must hold
    /// DDL rights on first boot; the named unique constraints back the
    /// idempotent follow/like upserts.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                user_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.write)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.write)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS follows (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                follow_user_id BIGINT NOT NULL REFERENCES users(id),
                CONSTRAINT unique_follow UNIQUE (user_id, follow_user_id)
            )
            "#,
        )
        .execute(&self.write)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS likes (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                post_id BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                CONSTRAINT unique_like UNIQUE (user_id, post_id)
            )
            "#,
        )
        .execute(&self.write)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                post_id BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                comment TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.write)
        .await?;

        info!("[Store] schema ready");
        Ok(())
    }

    /// Drain both pools. Called once the listener has stopped accepting.
    pub async fn close(&self) {
        self.write.close().await;
        self.read.close().await;
        info!("[Store] pools drained");
    }
}
