//! Data models for Souk marketplace entities.
//!
//! This module contains strongly-typed representations of catalog
//! entities, cart lines, order payloads, auth records, newtype ID
//! wrappers, and enumeration types for constrained values.

mod auth;
mod car;
mod cart_line;
mod entry;
mod enums;
mod ids;
mod money;
mod order;
mod product;
mod real_estate;
mod restaurant;
mod upload;
mod user;

pub use auth::{AuthResponse, Credentials, SignupRequest, StoredSession};
pub use car::Car;
pub use cart_line::CartLine;
pub use entry::CatalogEntry;
pub use enums::{Category, ListingKind, Transmission};
pub use ids::{
    CarId, LineId, ListingId, MenuItemId, OrderId, ProductId, RestaurantId, StoreId, UserId,
};
pub use money::Amount;
pub use order::{Order, OrderReceipt};
pub use product::Product;
pub use real_estate::RealEstateListing;
pub use restaurant::{MenuItem, Restaurant};
pub use upload::UploadedImage;
pub use user::UserRecord;
