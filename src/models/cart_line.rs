//! Cart line model.

use serde::{Deserialize, Serialize};

use super::{Amount, Category, LineId, MenuItem, Product, Restaurant, StoreId};

/// One purchasable entry in the active cart.
///
/// Invariant: `quantity >= 1` at all times. Construction starts at 1
/// and [`crate::cart::Cart`] clamps decrements rather than dropping
/// below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Unique line identifier (product ID, or composite for menu items).
    pub id: LineId,
    /// Display name; menu items carry the restaurant name annotation.
    pub name: String,
    /// Unit price in the smallest whole currency unit.
    pub unit_price: Amount,
    /// Reference to a display image.
    pub image_url: String,
    /// Number of units; always at least 1.
    pub quantity: u32,
    /// Coarse classification used only for payload grouping.
    pub category: Category,
    /// Owning store or restaurant, used to group submitted items by
    /// seller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreId>,
}

impl CartLine {
    /// Builds a line for a shopping product, with quantity 1.
    #[inline]
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            id: LineId::from(product.id.clone()),
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
            category: Category::Shopping,
            store: product.store.clone(),
        }
    }

    /// Builds a line for a restaurant menu item, with quantity 1.
    ///
    /// The line ID is the composite derived by
    /// [`LineId::for_menu_item`] and the name is annotated with the
    /// source restaurant so the cart stays readable across sellers.
    #[inline]
    #[must_use]
    pub fn for_menu_item(restaurant: &Restaurant, item: &MenuItem) -> Self {
        Self {
            id: LineId::for_menu_item(&restaurant.id, &item.id),
            name: format!("{} ({})", item.name, restaurant.name),
            unit_price: item.price,
            image_url: item.image_url.clone(),
            quantity: 1,
            category: Category::Restaurants,
            store: restaurant.store.clone(),
        }
    }

    /// Returns `unit_price * quantity` for this line.
    #[inline]
    #[must_use]
    pub fn line_total(&self) -> Amount {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuItemId, ProductId, RestaurantId};

    #[test]
    fn product_line_starts_at_one() {
        let product = Product {
            id: ProductId::from("p1"),
            name: "Dattes".to_owned(),
            price: Amount::new(800),
            image_url: "https://img.example/p1.jpg".to_owned(),
            store: Some(StoreId::from("s1")),
            description: None,
        };
        let line = CartLine::for_product(&product);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.id.as_inner(), "p1");
        assert_eq!(line.line_total(), Amount::new(800));
        assert_eq!(line.store, Some(StoreId::from("s1")));
    }

    #[test]
    fn menu_item_line_is_annotated() {
        let restaurant = Restaurant {
            id: RestaurantId::from("r1"),
            name: "Chez Fatimetou".to_owned(),
            image_url: String::new(),
            store: Some(StoreId::from("store-r1")),
            menu: Vec::new(),
        };
        let item = MenuItem {
            id: MenuItemId::from("m1"),
            name: "Thieboudienne".to_owned(),
            price: Amount::new(1_500),
            image_url: String::new(),
        };
        let line = CartLine::for_menu_item(&restaurant, &item);
        assert_eq!(line.name, "Thieboudienne (Chez Fatimetou)");
        assert_eq!(line.id.as_inner(), "menu-r1-m1");
        assert_eq!(line.category, Category::Restaurants);
    }

    #[test]
    fn line_total_scales_with_quantity() {
        let mut line = CartLine {
            id: LineId::from("p9"),
            name: "Sucre".to_owned(),
            unit_price: Amount::new(350),
            image_url: String::new(),
            quantity: 1,
            category: Category::Shopping,
            store: None,
        };
        line.quantity = 4;
        assert_eq!(line.line_total(), Amount::new(1_400));
    }
}
