//! User account model.

use serde::{Deserialize, Serialize};

use super::UserId;

/// A marketplace user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Phone number in international format.
    pub phone: String,
    /// Email address, when provided at signup.
    #[serde(default)]
    pub email: Option<String>,
}
