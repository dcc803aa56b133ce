//! Shared credential storage.

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Access/refresh token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Short-lived token attached to every request
    pub access: String,
    /// Longer-lived token exchanged for a new access token
    pub refresh: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Lifecycle of the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing stored (fresh client or explicit logout)
    #[default]
    Anonymous,
    /// An access token is held
    Authenticated,
    /// The session was terminated; a new login is required
    Expired,
}

#[derive(Debug, Default)]
struct Inner {
    credential: Option<Credential>,
    state: SessionState,
}

/// Process-wide credential store.
///
/// Cloning yields another handle to the same storage. Anyone may read;
/// only the client itself writes (login, refresh, expiry, logout).
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Inner>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_credential(credential: Option<Credential>) -> Self {
        let state = if credential.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        Self {
            inner: Arc::new(RwLock::new(Inner { credential, state })),
        }
    }

    /// Current token pair, if any.
    pub async fn credential(&self) -> Option<Credential> {
        self.inner.read().await.credential.clone()
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .credential
            .as_ref()
            .map(|c| c.access.clone())
    }

    /// Current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .credential
            .as_ref()
            .and_then(|c| c.refresh.clone())
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await == SessionState::Authenticated
    }

    /// Store a fresh token pair (login or restored session).
    pub(crate) async fn store(&self, credential: Credential) {
        let mut inner = self.inner.write().await;
        inner.credential = Some(credential);
        inner.state = SessionState::Authenticated;
    }

    /// Replace the access token after a successful refresh.
    ///
    /// Returns `false` when the session ended while the refresh was in
    /// flight; a finished session is never resurrected.
    pub(crate) async fn replace_access(&self, access: String, rotated: Option<String>) -> bool {
        let mut inner = self.inner.write().await;
        match inner.credential.as_mut() {
            Some(credential) => {
                credential.access = access;
                if rotated.is_some() {
                    credential.refresh = rotated;
                }
                true
            }
            None => false,
        }
    }

    /// Discard both tokens and mark the session as expired.
    pub(crate) async fn expire(&self) {
        let mut inner = self.inner.write().await;
        inner.credential = None;
        inner.state = SessionState::Expired;
    }

    /// Discard both tokens (explicit logout).
    pub(crate) async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.credential = None;
        inner.state = SessionState::Anonymous;
    }
}
