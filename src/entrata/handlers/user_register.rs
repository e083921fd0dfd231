use axum::{
    extract::Extension,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, instrument};

use super::{flash_redirect, valid_email};
use crate::entrata::{
    auth::{
        guards::{self, AuthContext},
        password,
        session::Sessions,
    },
    users::{DynUserStore, User},
    views,
};

#[derive(Deserialize)]
pub struct RegisterForm {
    fullname: String,
    email: String,
    password: String,
}

/// Render the registration view for an anonymous visitor.
pub async fn register_view(ctx: AuthContext, sessions: Extension<Sessions>) -> Response {
    if let Err(redirect) = guards::require_anonymous(&ctx) {
        return redirect.into_response();
    }

    let flash = ctx
        .token
        .as_deref()
        .and_then(|token| sessions.take_flash(token));

    views::register(flash.as_deref()).into_response()
}

/// Hash the submitted password and append a new record to the store.
///
/// Success redirects to the login view; failures redirect back to the
/// registration view with no detail beyond a generic message.
#[instrument(skip_all)]
pub async fn register(
    ctx: AuthContext,
    users: Extension<DynUserStore>,
    sessions: Extension<Sessions>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(redirect) = guards::require_anonymous(&ctx) {
        return redirect.into_response();
    }

    if !valid_email(&form.email) {
        return flash_redirect(&sessions, ctx.token.as_deref(), "Invalid email", "/register");
    }

    let password = form.password;
    let hashed = match tokio::task::spawn_blocking(move || password::hash_password(&password)).await
    {
        Ok(Ok(hash)) => hash,
        Ok(Err(err)) => {
            error!("Error hashing password: {err:?}");

            return flash_redirect(
                &sessions,
                ctx.token.as_deref(),
                "Registration failed",
                "/register",
            );
        }
        Err(err) => {
            error!("Password hashing task failed: {err}");

            return flash_redirect(
                &sessions,
                ctx.token.as_deref(),
                "Registration failed",
                "/register",
            );
        }
    };

    users.insert(User::new(form.fullname, form.email, hashed));

    Redirect::to("/login").into_response()
}
