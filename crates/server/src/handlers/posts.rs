//! Post handlers: lookup, create, delete, listing, likes, comments.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{parse_positive_id, StatusResponse};
use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::models::{NewPost, PostDetail};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub status: &'static str,
    pub post: PostDetail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPostResponse {
    pub status: &'static str,
    pub new_post: NewPost,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPostResponse {
    pub status: &'static str,
    pub deleted_post: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllPostsResponse {
    pub status: &'static str,
    pub all_posts: Vec<PostDetail>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub status: &'static str,
    pub comment: Value,
}

const INVALID_POST_ID: &str = "Please enter a valid post id.";

/// GET /api/posts/{id} — public.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>> {
    let post_id = parse_positive_id(&id, INVALID_POST_ID)?;
    info!("GET /api/posts/{post_id}");

    let post = state.posts.get(post_id).await?.ok_or_else(|| {
        Error::NotFound("Could not find the post you are looking for.".to_string())
    })?;

    Ok(Json(PostResponse {
        status: "SUCCESS",
        post,
    }))
}

/// POST /api/posts/
pub async fn create_post(
    State(state): State<AppState>,
    ctx: Ctx,
    body: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<NewPostResponse>> {
    let Json(req) = body.map_err(|rej| Error::BadRequest(rej.body_text()))?;

    let title = req
        .title
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest("Please enter a valid title.".to_string()))?;
    let content = req
        .content
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest("Please enter a valid content.".to_string()))?;

    info!("POST /api/posts/ - user {}", ctx.user_id());

    let new_post = state.posts.create(ctx.user_id(), title, content).await?;

    Ok(Json(NewPostResponse {
        status: "SUCCESS",
        new_post,
    }))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<DeletedPostResponse>> {
    let post_id = parse_positive_id(&id, INVALID_POST_ID)?;
    info!("DELETE /api/posts/{post_id} - user {}", ctx.user_id());

    let deleted = state
        .posts
        .delete(ctx.user_id(), post_id)
        .await?
        .ok_or_else(|| {
            Error::Forbidden("The post does not exists or not authorised to delete.".to_string())
        })?;

    Ok(Json(DeletedPostResponse {
        status: "SUCCESS",
        deleted_post: json!({ "id": deleted }),
    }))
}

/// POST /api/like/{id}
pub async fn like(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let post_id = parse_positive_id(&id, INVALID_POST_ID)?;
    info!("POST /api/like/{post_id} - user {}", ctx.user_id());

    state
        .posts
        .like(ctx.user_id(), post_id)
        .await?
        .ok_or_else(|| Error::BadRequest("The post id does not exists.".to_string()))?;

    Ok(Json(StatusResponse { status: "SUCCESS" }))
}

/// POST /api/unlike/{id}
pub async fn unlike(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let post_id = parse_positive_id(&id, INVALID_POST_ID)?;
    info!("POST /api/unlike/{post_id} - user {}", ctx.user_id());

    state
        .posts
        .unlike(ctx.user_id(), post_id)
        .await?
        .ok_or_else(|| {
            Error::BadRequest("The post does not exists or already unliked.".to_string())
        })?;

    Ok(Json(StatusResponse { status: "SUCCESS" }))
}

/// POST /api/comment/{id}
pub async fn comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    body: std::result::Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentResponse>> {
    let post_id = parse_positive_id(&id, INVALID_POST_ID)?;
    let Json(req) = body.map_err(|rej| Error::BadRequest(rej.body_text()))?;

    let text = req
        .comment
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest("Comment cannot be empty".to_string()))?;

    info!("POST /api/comment/{post_id} - user {}", ctx.user_id());

    let comment_id = state
        .posts
        .comment(ctx.user_id(), post_id, text)
        .await?
        .ok_or_else(|| Error::BadRequest("The post id is not valid!".to_string()))?;

    Ok(Json(CommentResponse {
        status: "SUCCESS",
        comment: json!({ "id": comment_id }),
    }))
}

/// GET /api/all_posts
pub async fn list_all_posts(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<AllPostsResponse>> {
    info!("GET /api/all_posts - user {}", ctx.user_id());

    let all_posts = state.posts.list_for_user(ctx.user_id()).await?;

    Ok(Json(AllPostsResponse {
        status: "SUCCESS",
        all_posts,
    }))
}
