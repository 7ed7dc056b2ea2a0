//! Tagged catalog entry union.
//!
//! Search results carry an explicit `kind` tag set at creation. Callers
//! match on the variant instead of sniffing for fields like `bedrooms`
//! or `price` at runtime.

use serde::{Deserialize, Serialize};

use super::{Amount, Car, Category, Product, RealEstateListing, Restaurant};

/// One entry in the marketplace catalog, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CatalogEntry {
    /// A shopping product.
    Product(Product),
    /// A car listing.
    Car(Car),
    /// A real estate listing.
    RealEstate(RealEstateListing),
    /// A restaurant (purchasable through its menu items).
    Restaurant(Restaurant),
}

impl CatalogEntry {
    /// Returns the raw identifier string of the underlying entity.
    #[inline]
    #[must_use]
    pub fn raw_id(&self) -> &str {
        match self {
            Self::Product(product) => product.id.as_inner(),
            Self::Car(car) => car.id.as_inner(),
            Self::RealEstate(listing) => listing.id.as_inner(),
            Self::Restaurant(restaurant) => restaurant.id.as_inner(),
        }
    }

    /// Returns the display name of the entry.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Product(product) => product.name.clone(),
            Self::Car(car) => car.display_name(),
            Self::RealEstate(listing) => listing.title.clone(),
            Self::Restaurant(restaurant) => restaurant.name.clone(),
        }
    }

    /// Returns the price, when the entry has a single one.
    ///
    /// Restaurants have per-menu-item prices and return `None`.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Option<Amount> {
        match self {
            Self::Product(product) => Some(product.price),
            Self::Car(car) => Some(car.price),
            Self::RealEstate(listing) => Some(listing.price),
            Self::Restaurant(_) => None,
        }
    }

    /// Returns the coarse category of the entry.
    #[inline]
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Product(_) => Category::Shopping,
            Self::Car(_) => Category::Cars,
            Self::RealEstate(_) => Category::RealEstate,
            Self::Restaurant(_) => Category::Restaurants,
        }
    }
}
