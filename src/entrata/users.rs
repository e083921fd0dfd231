//! User records and the credential store they live in.

use std::sync::{Arc, RwLock};
use ulid::Ulid;

/// A registered user. Records are append-only: never updated, never deleted,
/// gone on process restart.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Build a new record with a timestamp-derived opaque id.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Ulid::new().to_string(),
            name,
            email,
            password_hash,
        }
    }
}

/// Lookup and insert operations for user records.
///
/// Route logic depends on this trait only, so the in-memory list can be
/// swapped for persistent storage without touching the handlers.
pub trait UserStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<User>;
    fn find_by_id(&self, id: &str) -> Option<User>;
    fn insert(&self, user: User);
}

pub type DynUserStore = Arc<dyn UserStore>;

/// Append-only in-memory list.
///
/// Email uniqueness is not enforced; lookups return the first match. The lock
/// is held only for the scan or the push, and a poisoned lock degrades to a
/// miss or a dropped insert instead of a panic.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<User>>,
}

impl UserStore for MemoryUserStore {
    fn find_by_email(&self, email: &str) -> Option<User> {
        let records = self.records.read().ok()?;

        records.iter().find(|user| user.email == email).cloned()
    }

    fn find_by_id(&self, id: &str) -> Option<User> {
        let records = self.records.read().ok()?;

        records.iter().find(|user| user.id == id).cloned()
    }

    fn insert(&self, user: User) {
        if let Ok(mut records) = self.records.write() {
            records.push(user);
        }
    }
}
