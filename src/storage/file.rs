//! JSON-file-based session storage.
//!
//! Persists the two durable keys of the design as separate JSON files
//! (`token.json` and `user.json`) under a configurable directory
//! (default: `$XDG_DATA_HOME/souk-rs/`).

use core::future::{self, Future};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, SoukError};
use crate::models::{StoredSession, UserRecord};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "souk-rs";

/// File holding the opaque bearer token.
const TOKEN_FILE: &str = "token.json";
/// File holding the serialized user record.
const USER_FILE: &str = "user.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed session storage.
///
/// The token and the user record live in separate files, matching the
/// two-key layout of the durable store. A session is considered
/// present only when both files parse; a missing token means anonymous
/// regardless of a stale user file.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file
/// lock on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]). Reads take a shared lock, writes
/// an exclusive one.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock   (cross-process lock sentinel)
///   token.json
///   user.json
/// ```
#[derive(Debug)]
pub struct FileSessionStorage {
    /// Root directory containing the session files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileSessionStorage {
    /// Creates a file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and
    /// opens (or creates) the `storage.lock` sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this
    /// application.
    ///
    /// On Linux: `$XDG_DATA_HOME/souk-rs/` (typically
    /// `~/.local/share/souk-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be
    /// determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| SoukError::Storage("could not determine platform data directory".into()))
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file
    /// lock, executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write)
    /// file lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads and deserializes one JSON file; `Ok(None)` when missing.
    fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(SoukError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes a serialized JSON file (write-to-tmp then
    /// rename).
    fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp_path = self.path(&format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value).map_err(SoukError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Removes one file, tolerating its absence.
    fn remove_file(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Reads the session from disk (with shared lock).
    fn load_session(&self) -> Result<Option<StoredSession>> {
        self.with_shared_lock(|| {
            let token: Option<String> = self.read_json(TOKEN_FILE)?;
            let user: Option<UserRecord> = self.read_json(USER_FILE)?;
            match (token, user) {
                (Some(token), Some(user)) => Ok(Some(StoredSession { token, user })),
                // A missing or half-written pair means anonymous.
                (None | Some(_), _) => Ok(None),
            }
        })
    }

    /// Writes the session to disk (with exclusive lock).
    fn store_session(&self, session: &StoredSession) -> Result<()> {
        self.with_exclusive_lock(|| {
            self.write_json(TOKEN_FILE, &session.token)?;
            self.write_json(USER_FILE, &session.user)
        })
    }

    /// Removes both session files (with exclusive lock).
    fn clear_session(&self) -> Result<()> {
        self.with_exclusive_lock(|| {
            self.remove_file(TOKEN_FILE)?;
            self.remove_file(USER_FILE)
        })
    }
}

/// Wraps an I/O error into the storage error variant.
fn storage_io_error(err: std::io::Error) -> SoukError {
    SoukError::Storage(Box::new(err))
}

/// Wraps a mutex poison error.
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> SoukError {
    SoukError::Storage(err.to_string().into())
}

// ── BlockingSessionStorage implementation ───────────────────────────────

impl super::BlockingSessionStorage for FileSessionStorage {
    #[inline]
    fn load(&self) -> Result<Option<StoredSession>> {
        self.load_session()
    }

    #[inline]
    fn store(&self, session: StoredSession) -> Result<()> {
        self.store_session(&session)
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.clear_session()
    }
}

// ── SessionStorage (async) implementation ───────────────────────────────

impl super::SessionStorage for FileSessionStorage {
    #[inline]
    fn load(&self) -> impl Future<Output = Result<Option<StoredSession>>> + Send {
        future::ready(self.load_session())
    }

    #[inline]
    fn store(&self, session: StoredSession) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.store_session(&session))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.clear_session())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::storage::BlockingSessionStorage;

    /// Builds a test session record.
    fn session() -> StoredSession {
        StoredSession {
            token: "tok-file".to_owned(),
            user: UserRecord {
                id: UserId::from("u1"),
                name: "Aminetou".to_owned(),
                phone: "22244556677".to_owned(),
                email: None,
            },
        }
    }

    #[test]
    fn missing_files_mean_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn store_load_clear_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();

        storage.store(session()).unwrap();
        assert!(dir.path().join("token.json").exists());
        assert!(dir.path().join("user.json").exists());

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.token, "tok-file");
        assert_eq!(loaded.user.id, UserId::from("u1"));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        assert!(!dir.path().join("token.json").exists());
    }

    #[test]
    fn survives_reopening_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
            storage.store(session()).unwrap();
        }
        let reopened = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(reopened.load().unwrap().is_some());
    }

    #[test]
    fn stale_user_without_token_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().to_path_buf()).unwrap();
        storage.store(session()).unwrap();
        fs::remove_file(dir.path().join("token.json")).unwrap();
        assert!(storage.load().unwrap().is_none());
    }
}
