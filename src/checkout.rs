//! Order submission building blocks.
//!
//! The decision logic (authenticated remote call vs. external chat
//! fallback) lives in the facade; this module holds the pure pieces:
//! the fallback message text, the deep-link builder, the submission
//! outcome, and the re-entrancy guard that keeps a double trigger from
//! creating two orders.

use core::sync::atomic::{AtomicBool, Ordering};

use url::Url;

use crate::error::Result;
use crate::models::{Amount, CartLine, OrderId};

/// Base of the external chat deep link (WhatsApp).
const CHAT_LINK_BASE: &str = "https://wa.me/";

/// Result of one submit invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the order; the cart has been cleared.
    Placed(OrderId),
    /// The flow degraded to the external chat deep link; the cart is
    /// untouched so the user can retry.
    Fallback(Url),
    /// A submission was already in flight; this trigger was ignored.
    InFlight,
}

/// Renders the human-readable order summary used as the pre-filled
/// chat message: one line per cart entry plus the grand total.
#[inline]
#[must_use]
pub fn order_summary(lines: &[CartLine], total: Amount) -> String {
    let body = lines
        .iter()
        .map(|line| format!("- {} x{} = {}", line.name, line.quantity, line.line_total()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Commande Souk:\n{body}\nTotal: {total}")
}

/// Builds the external chat deep link with the URL-encoded order
/// summary pre-filled.
///
/// This performs no network call; opening the link is the embedding
/// UI's responsibility.
///
/// # Errors
///
/// Returns [`crate::error::SoukError::FallbackLink`] if the recipient
/// phone number does not form a valid URL.
#[inline]
pub fn fallback_link(phone: &str, lines: &[CartLine], total: Amount) -> Result<Url> {
    let mut link = Url::parse(&format!("{CHAT_LINK_BASE}{phone}"))?;
    let summary = order_summary(lines, total);
    let _query = link
        .query_pairs_mut()
        .append_pair("text", &summary)
        .finish();
    Ok(link)
}

/// Re-entrancy guard over a submit flag.
///
/// [`SubmitGuard::acquire`] flips the flag exactly once; the guard
/// releases it on drop, so every exit path (success, fallback, error)
/// re-enables submission. The guard does not cancel the request it
/// protects.
#[derive(Debug)]
pub struct SubmitGuard<'flag> {
    /// The shared in-flight flag.
    flag: &'flag AtomicBool,
}

impl<'flag> SubmitGuard<'flag> {
    /// Attempts to acquire the guard.
    ///
    /// Returns `None` when a submission is already in flight.
    #[inline]
    #[must_use]
    pub fn acquire(flag: &'flag AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for SubmitGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, LineId};

    /// Builds a cart line for the tests.
    fn line(id: &str, name: &str, unit_price: u64, quantity: u32) -> CartLine {
        CartLine {
            id: LineId::from(id),
            name: name.to_owned(),
            unit_price: Amount::new(unit_price),
            image_url: String::new(),
            quantity,
            category: Category::Shopping,
            store: None,
        }
    }

    #[test]
    fn summary_lists_lines_and_total() {
        let lines = vec![
            line("p1", "Dattes 1kg", 800, 2),
            line("p2", "Thé vert", 500, 1),
        ];
        let text = order_summary(&lines, Amount::new(2_100));
        assert!(text.contains("- Dattes 1kg x2 = 1 600 MRU"));
        assert!(text.contains("- Thé vert x1 = 500 MRU"));
        assert!(text.ends_with("Total: 2 100 MRU"));
    }

    #[test]
    fn fallback_link_encodes_summary() {
        let lines = vec![line("p1", "Thé vert", 500, 1)];
        let link = fallback_link("22200001111", &lines, Amount::new(500)).unwrap();
        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/22200001111");
        let query = link.query().unwrap();
        assert!(query.starts_with("text="));
        // Spaces and newlines must be percent-encoded.
        assert!(!query.contains(' '));
        assert!(!query.contains('\n'));
        // And the text round-trips through the query parser.
        let (_key, value) = link.query_pairs().next().unwrap();
        assert!(value.contains("Thé vert x1"));
    }

    #[test]
    fn guard_blocks_second_acquire_until_drop() {
        let flag = AtomicBool::new(false);
        let first = SubmitGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(SubmitGuard::acquire(&flag).is_none());
        drop(first);
        assert!(SubmitGuard::acquire(&flag).is_some());
    }
}
