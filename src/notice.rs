//! User-visible notifications as an explicit side channel.
//!
//! The core never calls into a rendering layer. Instead the facade
//! publishes [`Notice`] values to a [`NoticeSink`], and the embedding
//! UI decides how to surface them. [`TracingSink`] is the default;
//! [`CollectingSink`] records notices for assertions in tests.

use std::sync::Mutex;

use crate::models::{Amount, OrderId};

/// A user-visible notification emitted by the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An item was added to the cart (confirmation names the item).
    ItemAdded {
        /// Display name of the added item.
        name: String,
    },
    /// The user logged in.
    LoggedIn {
        /// Display name of the user.
        name: String,
    },
    /// The user logged out.
    LoggedOut,
    /// An order was accepted by the backend.
    OrderPlaced {
        /// Identifier assigned to the order.
        order_id: OrderId,
        /// Order total at submission time.
        total: Amount,
    },
    /// The remote submission failed and the flow degraded to the
    /// external-chat fallback.
    SubmissionFailed {
        /// Human-readable failure description.
        message: String,
    },
    /// The fallback deep link was produced (also used for anonymous
    /// submissions, which never attempt the remote call).
    FallbackUsed,
    /// A remote call outside the submission flow failed.
    ApiError {
        /// Human-readable failure description.
        message: String,
    },
}

/// Consumer of user-visible notifications.
///
/// Implementations must be cheap and non-blocking; publishing is
/// fire-and-forget from the facade's point of view.
pub trait NoticeSink: core::fmt::Debug + Send + Sync {
    /// Delivers one notice.
    fn publish(&self, notice: Notice);
}

/// Default sink that logs every notice through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    #[inline]
    fn publish(&self, notice: Notice) {
        match notice {
            Notice::ItemAdded { name } => tracing::info!(item = %name, "added to cart"),
            Notice::LoggedIn { name } => tracing::info!(user = %name, "logged in"),
            Notice::LoggedOut => tracing::info!("logged out"),
            Notice::OrderPlaced { order_id, total } => {
                tracing::info!(order_id = %order_id, total = %total, "order placed");
            }
            Notice::SubmissionFailed { message } => {
                tracing::warn!(message = %message, "order submission failed");
            }
            Notice::FallbackUsed => tracing::info!("order routed to chat fallback"),
            Notice::ApiError { message } => tracing::warn!(message = %message, "api error"),
        }
    }
}

/// Test sink that records every published notice.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Recorded notices, in publication order.
    notices: Mutex<Vec<Notice>>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded notices.
    ///
    /// Returns an empty list if the interior lock was poisoned; the
    /// sink is a test helper and must never panic the caller.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl NoticeSink for CollectingSink {
    #[inline]
    fn publish(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for std::sync::Arc<T> {
    #[inline]
    fn publish(&self, notice: Notice) {
        (**self).publish(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_records_in_order() {
        let sink = CollectingSink::new();
        sink.publish(Notice::ItemAdded {
            name: "Dattes".to_owned(),
        });
        sink.publish(Notice::FallbackUsed);
        let seen = sink.snapshot();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen.last(), Some(&Notice::FallbackUsed));
    }

    #[test]
    fn tracing_sink_accepts_every_variant() {
        let sink = TracingSink;
        sink.publish(Notice::LoggedOut);
        sink.publish(Notice::ApiError {
            message: "boom".to_owned(),
        });
    }
}
