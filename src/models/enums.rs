//! Enumeration types for constrained marketplace values.

use serde::{Deserialize, Serialize};

/// Coarse catalog category.
///
/// Used for payload grouping on submitted orders, never for pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// General shopping products.
    Shopping,
    /// Restaurant menu items.
    Restaurants,
    /// Real estate listings.
    RealEstate,
    /// Car listings.
    Cars,
}

/// Whether a real estate listing is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingKind {
    /// Monthly rental.
    Rent,
    /// Outright sale.
    Sale,
}

/// Car transmission type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transmission {
    /// Manual gearbox.
    Manual,
    /// Automatic gearbox.
    Automatic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&Category::RealEstate).unwrap(),
            "\"realEstate\""
        );
        let back: Category = serde_json::from_str("\"shopping\"").unwrap();
        assert_eq!(back, Category::Shopping);
    }

    #[test]
    fn listing_kind_roundtrip() {
        let json = serde_json::to_string(&ListingKind::Rent).unwrap();
        assert_eq!(json, "\"rent\"");
        let back: ListingKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ListingKind::Rent);
    }
}
