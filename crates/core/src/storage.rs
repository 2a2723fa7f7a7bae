//! Key-value storage abstraction over browser-style local storage
//!
//! The client persists tokens, session records and configuration overrides
//! through this trait rather than touching a concrete store directly, so the
//! whole stack is testable with an in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Well-known storage keys shared by the client and the page scripts
pub mod keys {
    /// Serialized [`SessionRecord`](crate::session::SessionRecord) JSON
    pub const USER_DATA: &str = "userData";
    /// Opaque bearer token from the last successful login
    pub const AUTH_TOKEN: &str = "authToken";
    /// Environment override: `"dev"` forces the local base, `"prod"` production
    pub const API_ENV: &str = "apiEnv";
    /// Full base-URL override, takes precedence over the mapped base
    pub const API_BASE_OVERRIDE: &str = "apiBaseOverride";
    /// Theme preference, owned by the UI layer
    pub const THEME_PREFERENCE: &str = "themePreference";
    /// Millisecond timestamp of the last user interaction
    pub const LAST_ACTIVITY: &str = "lastActivityAt";
    /// Chat message history, owned by the UI layer
    pub const CHAT_MESSAGES: &str = "chatMessages";
}

/// Synchronous string key-value store.
///
/// Mirrors the local-storage surface the original pages rely on: reads and
/// writes are synchronous and infallible from the caller's point of view
/// (a failing backing store behaves like an empty one).
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str);

    /// Remove `key` and its value if present
    fn remove(&self, key: &str);
}

/// In-memory [`Storage`] backed by a shared map.
///
/// Clones share the same backing map, which models multiple tabs of the same
/// origin: a token cleared through one handle is gone for every other handle
/// the next time it reads.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}
