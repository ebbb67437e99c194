use std::sync::{PoisonError, RwLock};

/// Access to the current session credential.
///
/// The gateway reads the store before every send and never retains its own
/// copy of the token. `clear` must be idempotent: clearing an already-empty
/// store is a no-op.
pub trait CredentialStore: Send + Sync {
    /// Returns the current access token, if a session is active.
    fn current_token(&self) -> Option<String>;

    /// Drops the current access token.
    fn clear(&self);
}

/// Navigation surface invoked when a session expires.
///
/// Fire-and-forget; the gateway calls `redirect_to_login` exactly once per
/// unrecovered authentication failure and does not consume a return value.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// In-process credential store backed by a lock.
///
/// Serves both as the embedded store for headless deployments and as the
/// substitute store in tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given access token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replaces the current access token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Navigator that ignores redirects.
///
/// For embeddings without a navigation surface (scripts, batch jobs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {}
}
