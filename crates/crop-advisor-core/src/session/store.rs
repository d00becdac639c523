//! Session token storage.
//!
//! All token reads and writes go through [`TokenStore`]; nothing else in the
//! workspace touches the underlying storage primitive.

use crate::error::Result;
use parking_lot::Mutex;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Durable holder of the opaque bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, if any.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Never fails; a missing token is fine.
    fn clear(&self);

    /// Whether a token is currently stored.
    fn has_token(&self) -> bool {
        self.get().is_some()
    }
}

/// Whether the token should survive a reload of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    pub persist_across_reload: bool,
}

impl StorePolicy {
    /// Keep the token across reloads.
    pub const PERSISTENT: StorePolicy = StorePolicy {
        persist_across_reload: true,
    };

    /// Drop the token when the page or process goes away.
    pub const EPHEMERAL: StorePolicy = StorePolicy {
        persist_across_reload: false,
    };
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self::PERSISTENT
    }
}

/// In-memory store, for tests and for clients that never persist.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        self.token.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(!store.has_token());

        store.set("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));

        store.set("def").unwrap();
        assert_eq!(store.get().as_deref(), Some("def"));

        store.clear();
        assert_eq!(store.get(), None);
        store.clear();
        assert!(!store.has_token());
    }

    #[test]
    fn default_policy_persists() {
        assert!(StorePolicy::default().persist_across_reload);
        assert!(!StorePolicy::EPHEMERAL.persist_across_reload);
    }
}
