use crate::storage::StoreError;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Keeps the token in memory only. Used by tests and as a fallback when no
/// data directory is available.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.token).clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *lock(&self.token) = None;
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The admin session: at most one bearer token, shared by every screen
/// that was handed a clone of this handle.
#[derive(Clone)]
pub struct Session {
    token: Arc<Mutex<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Opens the session, picking up a token persisted by an earlier run.
    pub fn open(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("stored session unreadable, starting signed out: {e}");
                None
            }
        };
        Self {
            token: Arc::new(Mutex::new(token)),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryTokenStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    pub fn is_signed_in(&self) -> bool {
        lock(&self.token).is_some()
    }

    /// Stores the token in memory and persists it. A persistence failure is
    /// returned, but the in-memory token stays set for this run.
    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        *lock(&self.token) = Some(token.to_string());
        self.store.save(token)
    }

    /// Drops the token. Persistence failures are logged only.
    pub fn clear_token(&self) {
        let had = lock(&self.token).take().is_some();
        if let Err(e) = self.store.clear() {
            warn!("failed to remove stored session: {e}");
        }
        if had {
            info!("session cleared");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_picks_up_persisted_token() {
        let session = Session::open(Arc::new(MemoryTokenStore::with_token("abc")));
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn clones_share_the_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::open(store.clone());
        let other = session.clone();
        session.set_token("t1").unwrap();
        assert_eq!(other.token().as_deref(), Some("t1"));
        assert_eq!(store.load().unwrap().as_deref(), Some("t1"));

        other.clear_token();
        assert!(!session.is_signed_in());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_without_token_is_harmless() {
        let session = Session::in_memory();
        session.clear_token();
        assert_eq!(session.token(), None);
    }
}
