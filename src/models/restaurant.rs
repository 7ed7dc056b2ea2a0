//! Restaurant and menu item models.

use serde::{Deserialize, Serialize};

use super::{Amount, MenuItemId, RestaurantId, StoreId};

/// A dish on a restaurant menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Identifier unique within the owning restaurant.
    pub id: MenuItemId,
    /// Dish name (without the restaurant annotation).
    pub name: String,
    /// Price in the smallest whole currency unit.
    pub price: Amount,
    /// Reference to a display image.
    pub image_url: String,
}

/// A restaurant with its menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Unique identifier.
    pub id: RestaurantId,
    /// Restaurant name.
    pub name: String,
    /// Reference to a display image.
    pub image_url: String,
    /// Store identifier used to group submitted order items by seller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreId>,
    /// Menu items offered by this restaurant.
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Restaurant {
    /// Looks up a menu item by its identifier.
    #[inline]
    #[must_use]
    pub fn menu_item(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_restaurant_with_menu() {
        let json = r#"{
            "id": "r1",
            "name": "Chez Fatimetou",
            "imageUrl": "https://img.example/r1.jpg",
            "store": "store-r1",
            "menu": [
                {"id": "m1", "name": "Thieboudienne", "price": 1500, "imageUrl": "https://img.example/m1.jpg"},
                {"id": "m2", "name": "Méchoui", "price": 3000, "imageUrl": "https://img.example/m2.jpg"}
            ]
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.menu.len(), 2);
        let dish = restaurant.menu_item(&MenuItemId::from("m2")).unwrap();
        assert_eq!(dish.price, Amount::new(3_000));
        assert!(restaurant.menu_item(&MenuItemId::from("m9")).is_none());
    }

    #[test]
    fn menu_defaults_to_empty() {
        let json = r#"{
            "id": "r2",
            "name": "Le Phare",
            "imageUrl": "https://img.example/r2.jpg"
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert!(restaurant.menu.is_empty());
        assert!(restaurant.store.is_none());
    }
}
