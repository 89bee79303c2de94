//! Request-level error taxonomy and the response envelope.
//!
//! Every failure leaving the API renders as
//! `{"status": <CODE>, "errorMessage": <message>}`. Storage failures are
//! logged with full detail server-side and cross the trust boundary as an
//! opaque generic message only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum Error {
    // Auth errors
    LoginFail,
    AuthFailNoToken,
    AuthFailInvalidToken,
    AuthFailUnknownUser,
    AuthFailCtxNotInRequestExt,

    // Domain errors
    BadRequest(String),
    UnprocessableEntity(String),
    Forbidden(String),
    NotFound(String),

    // Storage / unexpected
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

const AUTH_HEADER_MESSAGE: &str = "The user authorization header is either missing or invalid.";
const GENERIC_MESSAGE: &str = "Something went wrong.";

impl Error {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            Error::LoginFail => (
                StatusCode::UNAUTHORIZED,
                "USER_UNAUTHORISED",
                "User email or password is incorrect".to_string(),
            ),
            Error::AuthFailNoToken | Error::AuthFailInvalidToken => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                AUTH_HEADER_MESSAGE.to_string(),
            ),
            Error::AuthFailUnknownUser => (
                StatusCode::UNAUTHORIZED,
                "USER_UNAUTHORISED",
                AUTH_HEADER_MESSAGE.to_string(),
            ),
            Error::AuthFailCtxNotInRequestExt => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                GENERIC_MESSAGE.to_string(),
            ),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            Error::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg,
            ),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            Error::Internal(detail) => {
                error!("request failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    GENERIC_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "status": code,
            "errorMessage": message,
        }));

        (status, body).into_response()
    }
}

// Manager-level failures arrive as anyhow errors; at that layer they are
// storage or unexpected faults by definition.
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(format!("{err:#}"))
    }
}
