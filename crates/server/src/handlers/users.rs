//! Profile handler.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::models::Profile;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub status: &'static str,
    pub profile: Profile,
}

/// GET /api/user
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: Ctx,
) -> Result<Json<ProfileResponse>> {
    info!("GET /api/user - user {}", ctx.user_id());

    // The middleware has already proven the id exists; a missing profile
    // row at this point is a storage fault, not a client error.
    let profile = state
        .users
        .profile(ctx.user_id())
        .await?
        .ok_or_else(|| Error::Internal(format!("profile row missing for user {}", ctx.user_id())))?;

    Ok(Json(ProfileResponse {
        status: "SUCCESS",
        profile,
    }))
}
