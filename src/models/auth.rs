//! Authentication request/response models and the persisted session.

use serde::{Deserialize, Serialize};

use super::UserRecord;

/// Login request body for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Login identifier (phone number or email).
    pub login: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
}

/// Signup request body for `POST /auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Phone number in international format.
    pub phone: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
    /// Email address, optional at signup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response body of both auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    /// Authenticated user record.
    pub user: UserRecord,
}

/// The session payload written to durable key-value storage.
///
/// Maps onto the two storage keys of the design: `token` (opaque bearer
/// string) and `user` (serialized user record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Opaque bearer token.
    pub token: String,
    /// User record of the session owner.
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn auth_response_roundtrip() {
        let json = r#"{
            "token": "tok-123",
            "user": {"id": "u1", "name": "Aminetou", "phone": "22244556677"}
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token, "tok-123");
        assert_eq!(response.user.id, UserId::from("u1"));
    }

    #[test]
    fn signup_skips_missing_email() {
        let request = SignupRequest {
            name: "Sidi".to_owned(),
            phone: "22233445566".to_owned(),
            password: "hunter2".to_owned(),
            email: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("email"));
    }
}
