use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use super::{flash_redirect, redirect_with_cookie};
use crate::entrata::{
    auth::{
        self,
        guards::{self, AuthContext},
        session::Sessions,
        AuthFailure,
    },
    users::DynUserStore,
    views,
};

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// Render the login view for an anonymous visitor.
pub async fn login_view(ctx: AuthContext, sessions: Extension<Sessions>) -> Response {
    if let Err(redirect) = guards::require_anonymous(&ctx) {
        return redirect.into_response();
    }

    let flash = ctx
        .token
        .as_deref()
        .and_then(|token| sessions.take_flash(token));

    views::login(flash.as_deref()).into_response()
}

/// Authenticate a submitted email/password pair and establish a session.
///
/// Success redirects home with a fresh session cookie; every failure collapses
/// into a one-time message and a redirect back to the login view.
#[instrument(skip_all)]
pub async fn login(
    ctx: AuthContext,
    users: Extension<DynUserStore>,
    sessions: Extension<Sessions>,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(redirect) = guards::require_anonymous(&ctx) {
        return redirect.into_response();
    }

    let user = match auth::authenticate(&users, &form.email, &form.password).await {
        Ok(user) => user,
        Err(failure) => {
            debug!("Login failed: {failure:?}");

            return flash_redirect(&sessions, ctx.token.as_deref(), failure.message(), "/login");
        }
    };

    // Fresh token on login; the flash-carrying anonymous session, if any, is
    // discarded.
    if let Some(old) = ctx.token.as_deref() {
        sessions.remove(old);
    }

    match sessions.establish(&auth::serialize_user(&user)) {
        Ok(token) => {
            debug!("Login successful");

            redirect_with_cookie("/", &token)
        }
        Err(err) => {
            error!("Error establishing session: {err:?}");

            flash_redirect(&sessions, None, AuthFailure::Internal.message(), "/login")
        }
    }
}
