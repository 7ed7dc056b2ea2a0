//! Car listing model.

use serde::{Deserialize, Serialize};

use super::{Amount, CarId, Transmission};

/// A car offered on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Unique identifier.
    pub id: CarId,
    /// Manufacturer name.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: u16,
    /// Asking price in the smallest whole currency unit.
    pub price: Amount,
    /// Reference to a display image.
    pub image_url: String,
    /// Odometer reading in kilometers.
    #[serde(default)]
    pub mileage_km: Option<u32>,
    /// Gearbox type.
    #[serde(default)]
    pub transmission: Option<Transmission>,
}

impl Car {
    /// Returns the display name (`make` and `model` joined).
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.make, self.model, self.year)
    }
}
