//! In-memory session storage for testing.
//!
//! Provides [`InMemorySessionStorage`], a thread-safe in-memory
//! implementation of the storage traits. Ideal for unit and
//! integration tests where file I/O is undesirable.

use core::future::{self, Future};
use std::sync::Mutex;

use crate::error::{Result, SoukError};
use crate::models::StoredSession;

/// Thread-safe in-memory session storage.
///
/// Implements both [`super::SessionStorage`] (async) and
/// [`super::BlockingSessionStorage`] (blocking), providing a
/// zero-setup backend for tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    /// The stored session behind a mutex for interior mutability.
    inner: Mutex<Option<StoredSession>>,
}

impl InMemorySessionStorage {
    /// Creates an empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-seeded with a session, for tests that
    /// start logged in.
    #[inline]
    #[must_use]
    pub const fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Option<StoredSession>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> SoukError {
    SoukError::Storage(err.to_string().into())
}

// ── BlockingSessionStorage implementation ───────────────────────────────

impl super::BlockingSessionStorage for InMemorySessionStorage {
    #[inline]
    fn load(&self) -> Result<Option<StoredSession>> {
        self.with_lock(|inner| inner.clone())
    }

    #[inline]
    fn store(&self, session: StoredSession) -> Result<()> {
        self.with_lock(|inner| *inner = Some(session))
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| *inner = None)
    }
}

// ── SessionStorage (async) implementation ───────────────────────────────

impl super::SessionStorage for InMemorySessionStorage {
    #[inline]
    fn load(&self) -> impl Future<Output = Result<Option<StoredSession>>> + Send {
        future::ready(self.with_lock(|inner| inner.clone()))
    }

    #[inline]
    fn store(&self, session: StoredSession) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = Some(session)))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = None))
    }
}
