//! Newtype wrappers for entity identifiers.
//!
//! These prevent accidentally mixing up IDs of different entity types
//! at compile time. All marketplace IDs are opaque strings assigned by
//! the backend (or, for cart lines of menu items, derived locally).

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_string_id! {
    /// Identifier of a shopping product.
    ProductId
}

define_string_id! {
    /// Identifier of a car listing.
    CarId
}

define_string_id! {
    /// Identifier of a real estate listing.
    ListingId
}

define_string_id! {
    /// Identifier of a restaurant.
    RestaurantId
}

define_string_id! {
    /// Identifier of a menu item within a restaurant.
    MenuItemId
}

define_string_id! {
    /// Identifier of a store or restaurant owning catalog entries.
    StoreId
}

define_string_id! {
    /// Identifier of a user account.
    UserId
}

define_string_id! {
    /// Identifier assigned to an accepted order by the backend.
    OrderId
}

define_string_id! {
    /// Identifier of a cart line.
    ///
    /// For products this is the product ID verbatim. For menu items it
    /// is a composite derived via [`LineId::for_menu_item`], so a menu
    /// item can never collide with a product carrying the same raw ID.
    LineId
}

impl LineId {
    /// Derives the composite cart-line ID for a restaurant menu item.
    #[inline]
    #[must_use]
    pub fn for_menu_item(restaurant: &RestaurantId, item: &MenuItemId) -> Self {
        Self(format!("menu-{restaurant}-{item}"))
    }
}

impl From<ProductId> for LineId {
    #[inline]
    fn from(id: ProductId) -> Self {
        Self(id.into_inner())
    }
}
