use axum::response::{IntoResponse, Response};

use crate::entrata::{
    auth::guards::{self, AuthContext},
    views,
};

/// Render the home view for an authenticated user.
pub async fn home(ctx: AuthContext) -> Response {
    let user = match guards::require_authenticated(&ctx) {
        Ok(user) => user,
        Err(redirect) => return redirect.into_response(),
    };

    views::home(&user.name).into_response()
}
