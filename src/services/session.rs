//! Session store: the single source of truth for the bearer token

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::watch;

use super::storage::{MemoryTokenStorage, TokenStorage};

/// Derived authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl SessionState {
    fn of(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => SessionState::Authenticated,
            _ => SessionState::Anonymous,
        }
    }
}

struct Inner {
    token: RwLock<Option<String>>,
    /// Serializes writers so storage and memory change in the same order.
    /// Readers only take `token`, so they never wait on the disk.
    persist: Mutex<()>,
    storage: Box<dyn TokenStorage>,
    state_tx: watch::Sender<SessionState>,
}

/// Shared handle to the current session.
///
/// Cloning is cheap and every clone observes the same token. Construct one per
/// process and hand it to everything that needs it.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create an empty (anonymous) session backed by `storage`
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self::with_token(Box::new(storage), None)
    }

    /// Create a session restored from whatever `storage` holds
    pub fn load(storage: impl TokenStorage + 'static) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to restore persisted session, starting anonymous: {}", e);
                None
            }
        };

        if token.is_some() {
            tracing::debug!("Restored persisted session token");
        }

        Self::with_token(Box::new(storage), token)
    }

    /// Anonymous session that is never written to disk
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStorage::new())
    }

    fn with_token(storage: Box<dyn TokenStorage>, token: Option<String>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::of(token.as_deref()));
        Self {
            inner: Arc::new(Inner {
                token: RwLock::new(token),
                persist: Mutex::new(()),
                storage,
                state_tx,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Token to present to the server, if any. Empty tokens do not count.
    pub fn bearer_token(&self) -> Option<String> {
        self.token().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn state(&self) -> SessionState {
        let guard = self.inner.token.read().unwrap_or_else(PoisonError::into_inner);
        SessionState::of(guard.as_deref())
    }

    /// Replace the current token. The value is not inspected.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let _persist = self.inner.persist.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.inner.storage.store(&token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }

        let state = SessionState::of(Some(&token));
        *self.inner.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self.publish(state);
    }

    /// Clear the session. Calling it on an anonymous session does nothing.
    pub fn logout(&self) {
        self.clear();
    }

    /// Clear the token, returning whether one was actually held
    pub(crate) fn clear(&self) -> bool {
        let _persist = self.inner.persist.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.inner.storage.clear() {
            tracing::warn!("Failed to remove persisted session token: {}", e);
        }

        let previous = self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let was_authenticated = SessionState::of(previous.as_deref()) == SessionState::Authenticated;
        self.publish(SessionState::Anonymous);
        was_authenticated
    }

    /// Watch for ANONYMOUS/AUTHENTICATED transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    fn publish(&self, state: SessionState) {
        self.inner.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            tracing::debug!("Session state {:?} -> {:?}", current, state);
            *current = state;
            true
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
