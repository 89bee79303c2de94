//! HTTP handlers for the Reunion API.
//!
//! Handlers validate input, dispatch to exactly one manager call, and
//! wrap the result in the `{status, ...}` envelope. Authorization has
//! already happened in the middleware by the time a protected handler
//! runs.

pub mod auth;
pub mod follows;
pub mod posts;
pub mod users;

pub use auth::authenticate;
pub use follows::{follow, unfollow};
pub use posts::{comment, create_post, delete_post, get_post, like, list_all_posts, unlike};
pub use users::get_profile;

use serde::Serialize;

use crate::core::error::{Error, Result};

/// Bare success envelope for operations with no payload.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Parse a path id the way the routes require it: decimal digits only,
/// nonzero, within range.
pub(crate) fn parse_positive_id(raw: &str, message: &str) -> Result<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::BadRequest(message.to_string()));
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::BadRequest(message.to_string())),
    }
}
