//! Real estate listing model.

use serde::{Deserialize, Serialize};

use super::{Amount, ListingId, ListingKind};

/// A real estate listing (rental or sale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateListing {
    /// Unique identifier.
    pub id: ListingId,
    /// Listing title.
    pub title: String,
    /// Price in the smallest whole currency unit (per month for rentals).
    pub price: Amount,
    /// Reference to a display image.
    pub image_url: String,
    /// Rent or sale. Serialized as `listingKind`; the plain `kind`
    /// key is the [`crate::models::CatalogEntry`] discriminant.
    #[serde(rename = "listingKind")]
    pub kind: ListingKind,
    /// Number of bedrooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u8>,
    /// Number of bathrooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u8>,
    /// Floor area in square meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<u32>,
    /// District or neighborhood name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}
