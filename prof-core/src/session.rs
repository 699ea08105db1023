//! Session store: who is using the app right now.
//!
//! [`SessionStore`] holds at most one [`Identity`]. Every mutation replaces
//! the whole value, so readers observe either the old identity or the new
//! one, never a mix.
//!
//! [`SessionContext`] is the provider slot. It is created once at startup and
//! handed to every screen; the store is provided into it by the app
//! initializer. Reading through a context that was never provided is an
//! integration bug and fails with [`SessionError::NoProvider`] instead of
//! pretending nobody is logged in.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use thiserror::Error;

use profesionales_types::Identity;

/// Session access errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The store was read before the app initializer provided it.
    #[error("session store used outside of its provider")]
    NoProvider,

    /// The store was provided twice.
    #[error("session store already provided")]
    AlreadyProvided,

    /// An identity is required but nobody is logged in.
    #[error("not logged in")]
    LoggedOut,
}

/// Process-wide holder of the current identity.
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Arc<Identity>>>>,
}

impl SessionStore {
    /// Create an empty (logged-out) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current identity, replacing any previous one.
    ///
    /// No validation happens here; forms validate before calling.
    pub fn login(&self, identity: Identity) {
        self.replace(Some(Arc::new(identity)));
    }

    /// Clear the current identity.
    ///
    /// Navigation back to the login screen is the caller's job.
    pub fn logout(&self) {
        self.replace(None);
    }

    /// Replace the current identity after a profile edit.
    pub fn update_user(&self, identity: Identity) {
        self.replace(Some(Arc::new(identity)));
    }

    /// Snapshot of the current identity.
    pub fn current(&self) -> Option<Arc<Identity>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True iff an identity is present.
    pub fn is_logged_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current identity, or [`SessionError::LoggedOut`].
    pub fn require(&self) -> Result<Arc<Identity>, SessionError> {
        self.current().ok_or(SessionError::LoggedOut)
    }

    fn replace(&self, value: Option<Arc<Identity>>) {
        // Whole-value swap; a poisoned lock still holds a complete value.
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = value;
    }
}

/// Provider slot for the session store.
///
/// Cheap to clone; all clones see the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    slot: Arc<OnceLock<SessionStore>>,
}

impl SessionContext {
    /// Create an empty context (no store provided yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a fresh store already provided.
    pub fn provided() -> Self {
        let context = Self::new();
        // A new slot is always empty.
        let _ = context.slot.set(SessionStore::new());
        context
    }

    /// Provide the store. Done once, by the app initializer.
    pub fn provide(&self, store: SessionStore) -> Result<(), SessionError> {
        self.slot.set(store).map_err(|_| SessionError::AlreadyProvided)
    }

    /// The provided store, or [`SessionError::NoProvider`].
    pub fn session(&self) -> Result<SessionStore, SessionError> {
        self.slot.get().cloned().ok_or(SessionError::NoProvider)
    }
}
