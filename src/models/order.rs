//! Order submission payload and receipt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, CartLine, OrderId, UserId};

/// The payload synthesized at submit time for `POST /orders`.
///
/// `items` is a by-value snapshot of the cart at the submission
/// instant; later cart mutation must not affect an in-flight
/// submission. `total` is recomputed at submit time, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Snapshot of all cart lines at submission time.
    pub items: Vec<CartLine>,
    /// Sum of `unit_price * quantity` over `items`.
    pub total: Amount,
    /// Submission timestamp (RFC 3339 on the wire).
    pub order_date: DateTime<Utc>,
    /// Identity of the authenticated submitter.
    ///
    /// The anonymous path never reaches the remote API, so this is
    /// always present on submitted orders.
    pub user_id: UserId,
}

/// Success response of the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Identifier assigned to the accepted order.
    pub order_id: OrderId,
}
