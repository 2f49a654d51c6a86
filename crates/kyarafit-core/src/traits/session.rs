//! Session provider seam.
//!
//! Components that fetch data receive a provider explicitly instead of
//! reaching for ambient session state.

use tokio::sync::watch;

use crate::types::session::SessionState;

/// Source of the current authentication session.
pub trait SessionProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The session as of now.
    fn current(&self) -> SessionState;

    /// Subscribe to session changes, if this provider can change.
    fn subscribe(&self) -> Option<watch::Receiver<SessionState>> {
        None
    }
}

/// A session fixed for the lifetime of the process (CLI, config token).
#[derive(Debug, Clone)]
pub struct StaticSession {
    state: SessionState,
}

impl StaticSession {
    /// Create a provider that always reports `state`.
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    /// Create a provider from an optional raw token.
    pub fn from_token(token: Option<&str>) -> Self {
        Self::new(SessionState::from_token(token))
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> SessionState {
        self.state.clone()
    }
}

/// A session that can move between pending, absent, and present.
#[derive(Debug)]
pub struct WatchSession {
    tx: watch::Sender<SessionState>,
}

impl WatchSession {
    /// Create a provider starting in `initial`.
    pub fn new(initial: SessionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current session and notify subscribers.
    pub fn set(&self, state: SessionState) {
        self.tx.send_replace(state);
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new(SessionState::Pending)
    }
}

impl SessionProvider for WatchSession {
    fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> Option<watch::Receiver<SessionState>> {
        Some(self.tx.subscribe())
    }
}
