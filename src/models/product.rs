//! Shopping product model.

use serde::{Deserialize, Serialize};

use super::{Amount, ProductId, StoreId};

/// A purchasable shopping product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the smallest whole currency unit.
    pub price: Amount,
    /// Reference to a display image (opaque to this crate).
    pub image_url: String,
    /// Owning store, when the product belongs to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreId>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_product() {
        let json = r#"{
            "id": "p1",
            "name": "Boubou brodé",
            "price": 15000,
            "imageUrl": "https://img.example/p1.jpg",
            "store": "store-3"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::from("p1"));
        assert_eq!(product.price, Amount::new(15_000));
        assert_eq!(product.store, Some(StoreId::from("store-3")));
        assert!(product.description.is_none());
    }

    #[test]
    fn serialize_roundtrip() {
        let product = Product {
            id: ProductId::from("p2"),
            name: "Thé vert".to_owned(),
            price: Amount::new(500),
            image_url: "https://img.example/p2.jpg".to_owned(),
            store: None,
            description: Some("Thé vert de Chine 200g".to_owned()),
        };
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
