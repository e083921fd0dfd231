//! Request-scoped authentication context and the route guards over it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Redirect,
    Extension,
};

use super::{deserialize_user, session, session::Sessions};
use crate::entrata::users::{DynUserStore, User};

/// What the request's session says about who is asking.
///
/// Extracted once per request; guards and handlers read this instead of poking
/// at cookies or the session store directly.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Raw session token from the cookie, when it maps to a live record.
    pub token: Option<String>,
    /// The authenticated user, when the session resolves to one.
    pub user: Option<User>,
}

impl AuthContext {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(sessions) = Extension::<Sessions>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        let Extension(users) = Extension::<DynUserStore>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let Some(token) = session::extract_session_token(&parts.headers) else {
            return Ok(Self::anonymous());
        };

        // A stale cookie with no record behind it counts as anonymous.
        let Some(record) = sessions.get(&token) else {
            return Ok(Self::anonymous());
        };

        let user = record
            .user_id
            .as_deref()
            .and_then(|id| deserialize_user(&users, id));

        Ok(Self {
            token: Some(token),
            user,
        })
    }
}

/// Let the request through only when an identity is present.
pub fn require_authenticated(ctx: &AuthContext) -> Result<&User, Redirect> {
    ctx.user.as_ref().ok_or_else(|| Redirect::to("/login"))
}

/// Let the request through only when no identity is present.
pub fn require_anonymous(ctx: &AuthContext) -> Result<(), Redirect> {
    if ctx.is_authenticated() {
        return Err(Redirect::to("/"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entrata::users::User;

    fn authenticated() -> AuthContext {
        AuthContext {
            token: Some("token".to_string()),
            user: Some(User::new(
                "Alice".to_string(),
                "alice@example.com".to_string(),
                "$hash".to_string(),
            )),
        }
    }

    #[test]
    fn require_authenticated_passes_a_user_through() {
        let ctx = authenticated();
        let user = require_authenticated(&ctx).expect("authenticated");
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn require_authenticated_redirects_anonymous() {
        let ctx = AuthContext::anonymous();
        assert!(require_authenticated(&ctx).is_err());
    }

    #[test]
    fn require_anonymous_passes_anonymous_through() {
        let ctx = AuthContext::anonymous();
        assert!(require_anonymous(&ctx).is_ok());
    }

    #[test]
    fn require_anonymous_redirects_authenticated() {
        let ctx = authenticated();
        assert!(require_anonymous(&ctx).is_err());
    }

    #[test]
    fn flash_only_session_is_not_authenticated() {
        let ctx = AuthContext {
            token: Some("token".to_string()),
            user: None,
        };
        assert!(!ctx.is_authenticated());
        assert!(require_anonymous(&ctx).is_ok());
    }
}
