//! Authentication gate: credential verification and the session identity
//! round-trip.

pub mod guards;
pub mod password;
pub mod session;

use crate::entrata::users::{DynUserStore, User};
use tracing::error;

/// Why a login attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No record matches the submitted email.
    UnknownEmail,
    /// A record exists but the password does not match.
    WrongPassword,
    /// The stored hash could not be checked at all.
    Internal,
}

impl AuthFailure {
    /// One-time message surfaced on the login view.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownEmail => "No user found with that email",
            Self::WrongPassword => "Password incorrect",
            Self::Internal => "Authentication failed",
        }
    }
}

/// Verify an email/password pair against the credential store.
///
/// Lookup is by email; the Argon2 comparison runs on the blocking pool so it
/// suspends only the calling request.
pub async fn authenticate(
    users: &DynUserStore,
    email: &str,
    password: &str,
) -> Result<User, AuthFailure> {
    let Some(user) = users.find_by_email(email) else {
        return Err(AuthFailure::UnknownEmail);
    };

    let candidate = password.to_string();
    let hash = user.password_hash.clone();

    let verified = tokio::task::spawn_blocking(move || password::verify_password(&candidate, &hash))
        .await
        .map_err(|err| {
            error!("Password verification task failed: {err}");

            AuthFailure::Internal
        })?;

    match verified {
        Ok(true) => Ok(user),
        Ok(false) => Err(AuthFailure::WrongPassword),
        Err(err) => {
            error!("Error comparing password: {err:?}");

            Err(AuthFailure::Internal)
        }
    }
}

/// Store a user into the session: only the id is kept.
#[must_use]
pub fn serialize_user(user: &User) -> String {
    user.id.clone()
}

/// Resolve a stored id back into the full record, if it still exists.
#[must_use]
pub fn deserialize_user(users: &DynUserStore, id: &str) -> Option<User> {
    users.find_by_id(id)
}
