//! Authentication handler.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AppState;
use crate::core::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthenticateRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub status: &'static str,
    pub jwt_token: String,
}

/// POST /api/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    body: std::result::Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Json<AuthenticateResponse>> {
    let Json(req) = body.map_err(|rej| Error::BadRequest(rej.body_text()))?;

    let email = req
        .email
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest("Please enter a valid email".to_string()))?;
    let password = req
        .password
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest("Please enter a valid password".to_string()))?;

    info!("POST /api/authenticate - {email}");

    let user = state
        .users
        .authenticate(email, password)
        .await?
        .ok_or(Error::LoginFail)?;

    let jwt_token = state
        .tokens
        .issue(&user)
        .map_err(|err| Error::Internal(err.to_string()))?;

    Ok(Json(AuthenticateResponse {
        status: "SUCCESS",
        jwt_token,
    }))
}
