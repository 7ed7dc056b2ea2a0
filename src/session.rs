//! In-memory authentication state.
//!
//! [`Session`] is the process-wide login state of the design, held as
//! an explicit value inside the facade instead of an ambient singleton.
//! The invariant "`user` is non-null if and only if logged in" is
//! structural: token and user live in a single `Option` together.

use secrecy::SecretString;

use crate::models::{StoredSession, UserRecord};

/// Authenticated identity: bearer token plus user record.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Opaque bearer token, redacted in `Debug` output.
    pub token: SecretString,
    /// User record of the session owner.
    pub user: UserRecord,
}

/// Current login state.
///
/// Starts anonymous; rehydrate from durable storage with
/// [`Session::restore`] before first use.
#[derive(Debug, Default)]
pub struct Session {
    /// The authenticated identity, or `None` when anonymous.
    identity: Option<Identity>,
}

impl Session {
    /// Creates an anonymous session.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { identity: None }
    }

    /// Rehydrates the session from a persisted record.
    #[inline]
    pub fn restore(&mut self, stored: StoredSession) {
        self.identity = Some(Identity {
            token: SecretString::from(stored.token),
            user: stored.user,
        });
    }

    /// Switches to the authenticated state.
    #[inline]
    pub fn log_in(&mut self, token: SecretString, user: UserRecord) {
        self.identity = Some(Identity { token, user });
    }

    /// Switches to the anonymous state.
    #[inline]
    pub fn log_out(&mut self) {
        self.identity = None;
    }

    /// Returns `true` when a user is logged in.
    #[inline]
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the current user record, if logged in.
    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    /// Returns the current bearer token, if logged in.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.identity.as_ref().map(|identity| &identity.token)
    }

    /// Returns a by-value copy of the identity, if logged in.
    ///
    /// Used by the facade to release the session lock before awaiting
    /// network calls.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
