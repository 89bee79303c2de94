//! Wire and row models for the Reunion API.
//!
//! Field names serialize to the camelCase keys the HTTP surface exposes;
//! the structs double as sqlx row mappings for the statements in the
//! manager modules.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A user identity, as carried in tokens and returned by lookups.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
}

/// Profile payload for `GET /api/user`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub user_name: String,
    pub following: i64,
    pub followers: i64,
}

/// A freshly created post, as returned by `POST /api/posts/`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its comment list and like count.
///
/// `comments` is the JSON aggregate built in SQL: an array of
/// `{comment, createdAt}` objects ordered by creation time, `[]` when the
/// post has none.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub comments: serde_json::Value,
    pub likes: i64,
}
