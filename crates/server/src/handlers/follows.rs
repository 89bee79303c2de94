//! Follow/unfollow handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::{parse_positive_id, StatusResponse};
use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};

const INVALID_USER_ID: &str = "Please enter a valid user id";

/// POST /api/follow/{id}
pub async fn follow(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let target_id = parse_positive_id(&id, INVALID_USER_ID)?;
    if target_id == ctx.user_id() {
        return Err(Error::UnprocessableEntity(
            "Cannot follow yourself.".to_string(),
        ));
    }

    info!("POST /api/follow/{target_id} - user {}", ctx.user_id());

    state
        .follows
        .follow(ctx.user_id(), target_id)
        .await?
        .ok_or_else(|| Error::BadRequest("User trying to follow does not exists.".to_string()))?;

    Ok(Json(StatusResponse { status: "SUCCESS" }))
}

/// POST /api/unfollow/{id}
pub async fn unfollow(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let target_id = parse_positive_id(&id, INVALID_USER_ID)?;
    info!("POST /api/unfollow/{target_id} - user {}", ctx.user_id());

    state
        .follows
        .unfollow(ctx.user_id(), target_id)
        .await?
        .ok_or_else(|| {
            Error::BadRequest("The user does not exists or is already unfollowed.".to_string())
        })?;

    Ok(Json(StatusResponse { status: "SUCCESS" }))
}
