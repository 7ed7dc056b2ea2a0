//! Error types for the Souk client library.

/// All errors that can occur when using the Souk client.
#[derive(Debug, thiserror::Error)]
pub enum SoukError {
    /// HTTP transport failed (connection, timeout, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The API returned a non-success status.
    ///
    /// `message` is the human-readable text from the JSON error body
    /// when one could be parsed, or a generic
    /// `server communication error: <status>` line otherwise.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable error message.
        message: String,
    },

    /// Session storage backend failed.
    #[error("session storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// The fallback deep link could not be constructed.
    #[error("fallback link error: {0}")]
    FallbackLink(#[from] url::ParseError),

    /// The operation requires an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Checkout was invoked with an empty cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SoukError>;
