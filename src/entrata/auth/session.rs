//! Cookie-backed sessions with an in-memory store.
//!
//! The cookie carries a random token; the store is keyed by a secret-keyed
//! hash of it, so raw tokens never sit in memory and records cannot be minted
//! or probed without the configured secret.

use anyhow::{anyhow, Context, Result};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

pub(crate) const SESSION_COOKIE_NAME: &str = "entrata_session";

/// Server-side session state: the serialized user id and an optional one-time
/// flash message. A record may hold only a flash, carried across a redirect
/// for an anonymous visitor.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub user_id: Option<String>,
    pub flash: Option<String>,
}

/// In-memory session store, shared across worker threads.
#[derive(Clone, Debug)]
pub struct Sessions {
    secret: Arc<SecretString>,
    records: Arc<RwLock<HashMap<Vec<u8>, SessionRecord>>>,
}

impl Sessions {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret: Arc::new(secret),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a fresh session for an authenticated user. Returns the raw token
    /// destined for the cookie; only its hash is kept.
    pub fn establish(&self, user_id: &str) -> Result<String> {
        let token = generate_session_token()?;

        self.put(
            self.hash_token(&token),
            SessionRecord {
                user_id: Some(user_id.to_string()),
                flash: None,
            },
        )?;

        Ok(token)
    }

    /// Look up a presented token. `None` when the token is unknown.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<SessionRecord> {
        let records = self.records.read().ok()?;

        records.get(&self.hash_token(token)).cloned()
    }

    /// Attach a one-time message to an existing session, or to a brand-new
    /// anonymous one. Returns a token for the cookie when a session had to be
    /// created.
    pub fn set_flash(&self, token: Option<&str>, message: &str) -> Result<Option<String>> {
        if let Some(token) = token {
            let key = self.hash_token(token);
            if let Ok(mut records) = self.records.write() {
                if let Some(record) = records.get_mut(&key) {
                    record.flash = Some(message.to_string());

                    return Ok(None);
                }
            }
        }

        let token = generate_session_token()?;
        self.put(
            self.hash_token(&token),
            SessionRecord {
                user_id: None,
                flash: Some(message.to_string()),
            },
        )?;

        Ok(Some(token))
    }

    /// Take (and clear) the one-time message for a session, if any.
    #[must_use]
    pub fn take_flash(&self, token: &str) -> Option<String> {
        let mut records = self.records.write().ok()?;

        records
            .get_mut(&self.hash_token(token))
            .and_then(|record| record.flash.take())
    }

    /// Destroy a session.
    pub fn remove(&self, token: &str) {
        if let Ok(mut records) = self.records.write() {
            records.remove(&self.hash_token(token));
        }
    }

    fn put(&self, key: Vec<u8>, record: SessionRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        records.insert(key, record);

        Ok(())
    }

    /// Hash a session token so raw values never sit in the store. Keyed with
    /// the configured secret.
    fn hash_token(&self, token: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.expose_secret().as_bytes());
        hasher.update(token.as_bytes());
        hasher.finalize().to_vec()
    }
}

/// Create a new session token for the auth cookie.
/// The raw value is only sent to the client; the store keeps a hash.
fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Build the `HttpOnly` cookie carrying the session token.
pub(crate) fn session_cookie(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

/// Expire the session cookie.
pub(crate) fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

/// Pull the session token out of the `Cookie` header, if present.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
