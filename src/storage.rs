//! Pluggable durable storage for the authentication session.
//!
//! This module defines the [`SessionStorage`] (async) and
//! [`BlockingSessionStorage`] (blocking) traits via a shared macro,
//! mirroring the client generation pattern in [`crate::client`]. The
//! store holds exactly two logical keys: the bearer token and the
//! serialized user record, read at process start and written on
//! login/logout only.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileSessionStorage;
pub use memory::InMemorySessionStorage;

/// Generates a session storage trait (async or blocking).
///
/// Uses `@methods` to define the method list once, and `@method` to
/// render each method in async (`impl Future + Send`) or blocking
/// (`fn`) style.
macro_rules! define_session_storage {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_session_storage!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_session_storage!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        define_session_storage!(@method $mode, load,
            "Reads the persisted session.\n\nReturns `Ok(None)` when no session is stored (anonymous start).\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<StoredSession>>);
        define_session_storage!(@method $mode, store,
            "Persists the session (token and user record) atomically with respect to readers.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            session: StoredSession, -> Result<()>);
        define_session_storage!(@method $mode, clear,
            "Removes the persisted session; no-op when nothing is stored.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

mod async_storage {
    //! Async session storage trait definition.

    use crate::error::Result;
    use crate::models::StoredSession;

    define_session_storage! {
        trait_name: SessionStorage,
        trait_doc: "Async durable storage for the authentication session.\n\nAll methods take `&self` — implementations should use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }
}

mod blocking_storage {
    //! Blocking session storage trait definition.

    use crate::error::Result;
    use crate::models::StoredSession;

    define_session_storage! {
        trait_name: BlockingSessionStorage,
        trait_doc: "Blocking durable storage for the authentication session.\n\nAll methods take `&self` — implementations should use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }
}

pub use async_storage::SessionStorage;
pub use blocking_storage::BlockingSessionStorage;
