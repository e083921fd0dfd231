pub mod health;
pub use self::health::health;

pub mod home;
pub use self::home::home;

pub mod user_login;
pub use self::user_login::{login, login_view};

pub mod user_logout;
pub use self::user_logout::logout;

pub mod user_register;
pub use self::user_register::{register, register_view};

// common functions for the handlers
use crate::entrata::auth::session::{self, Sessions};
use axum::{
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use tracing::error;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Redirect carrying a one-time message. Sets a session cookie when the flash
/// had to create a session for an anonymous visitor.
pub(crate) fn flash_redirect(
    sessions: &Sessions,
    token: Option<&str>,
    message: &str,
    to: &str,
) -> Response {
    let mut headers = HeaderMap::new();

    match sessions.set_flash(token, message) {
        Ok(Some(new_token)) => {
            if let Ok(cookie) = session::session_cookie(&new_token) {
                headers.insert(SET_COOKIE, cookie);
            }
        }
        Ok(None) => {}
        Err(err) => error!("Error storing flash message: {err:?}"),
    }

    (headers, Redirect::to(to)).into_response()
}

/// Redirect that also hands the client a session cookie.
pub(crate) fn redirect_with_cookie(to: &str, token: &str) -> Response {
    let mut headers = HeaderMap::new();

    if let Ok(cookie) = session::session_cookie(token) {
        headers.insert(SET_COOKIE, cookie);
    }

    (headers, Redirect::to(to)).into_response()
}
