use crate::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Gate for every protected route: header presence, token validity,
/// then a live identity check against the store.
///
/// The client sees a generic 401 for any token failure; the log keeps
/// the distinction.
pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    // The header carries the raw token, no scheme prefix.
    let auth_header = req.headers().get(header::AUTHORIZATION);
    let token = match auth_header {
        Some(h) => h.to_str().map_err(|_| Error::AuthFailInvalidToken)?,
        None => return Err(Error::AuthFailNoToken),
    };

    let claims = state.tokens.validate(token).map_err(|err| {
        debug!("[Auth] token rejected: {err}");
        Error::AuthFailInvalidToken
    })?;

    // A token can outlive its account; resolve the id before trusting it.
    let user = state
        .users
        .get_by_id(claims.id)
        .await?
        .ok_or(Error::AuthFailUnknownUser)?;

    req.extensions_mut().insert(Ctx::new(user.id));

    Ok(next.run(req).await)
}
