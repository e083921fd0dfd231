use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::entrata::auth::{
    guards::AuthContext,
    session::{self, Sessions},
};

/// Destroy the session and send the visitor back to the login view.
///
/// Errors are logged and swallowed; the cookie is always cleared, even when no
/// session record was found behind it.
pub async fn logout(ctx: AuthContext, sessions: Extension<Sessions>) -> Response {
    if let Some(token) = ctx.token.as_deref() {
        sessions.remove(token);
    }

    let mut headers = HeaderMap::new();
    match session::clear_session_cookie() {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Error clearing session cookie: {err}"),
    }

    (headers, Redirect::to("/login")).into_response()
}
