//! Image upload response model.

use serde::{Deserialize, Serialize};

/// Response of the multipart `POST /uploads` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Public URL of the stored image.
    pub url: String,
}
