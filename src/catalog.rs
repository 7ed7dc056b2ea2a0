//! In-memory marketplace catalog with composable filtering.
//!
//! The catalog is a static collection browsed by the user; there is no
//! remote fetch here. [`CatalogFilter`] follows the builder style: all
//! set criteria are combined, an entry must satisfy every one to pass.

use crate::models::{
    Amount, Car, CarId, CatalogEntry, Category, ListingKind, MenuItem, MenuItemId, Product,
    ProductId, RealEstateListing, Restaurant, RestaurantId, StoreId, Transmission,
};

/// Composable filter for searching the catalog.
///
/// # Examples
///
/// ```
/// use souk_rs::catalog::{Catalog, CatalogFilter};
/// use souk_rs::models::Category;
///
/// let catalog = Catalog::sample();
/// let hits = catalog.search(
///     &CatalogFilter::new()
///         .category(Category::Shopping)
///         .price_range(0_u64, 20_000_u64),
/// );
/// assert!(!hits.is_empty());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Free-text query (case-insensitive substring over display names).
    pub query: Option<String>,
    /// Coarse category.
    pub category: Option<Category>,
    /// Minimum price (inclusive, smallest currency unit).
    pub min_price: Option<Amount>,
    /// Maximum price (inclusive, smallest currency unit).
    pub max_price: Option<Amount>,
    /// Owning store.
    pub store: Option<StoreId>,
}

impl CatalogFilter {
    /// Creates an empty filter that matches every entry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to entries whose display name contains the given text
    /// (case-insensitive).
    #[inline]
    #[must_use]
    pub fn query<T: Into<String>>(mut self, text: T) -> Self {
        self.query = Some(text.into());
        self
    }

    /// Restricts to entries of the given category.
    #[inline]
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to entries priced within `[min, max]` (inclusive).
    ///
    /// Restaurants have no single price and never match a price-bounded
    /// filter.
    #[inline]
    #[must_use]
    pub fn price_range<A: Into<Amount>>(mut self, min: A, max: A) -> Self {
        self.min_price = Some(min.into());
        self.max_price = Some(max.into());
        self
    }

    /// Restricts to entries owned by the given store.
    #[inline]
    #[must_use]
    pub fn store(mut self, id: StoreId) -> Self {
        self.store = Some(id);
        self
    }

    /// Returns `true` if the entry satisfies all set criteria.
    #[inline]
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_query(entry)
            && self.matches_category(entry)
            && self.matches_price(entry)
            && self.matches_store(entry)
    }

    /// Checks the free-text criterion.
    fn matches_query(&self, entry: &CatalogEntry) -> bool {
        self.query.as_ref().is_none_or(|query| {
            entry
                .display_name()
                .to_lowercase()
                .contains(&query.to_lowercase())
        })
    }

    /// Checks the category criterion.
    fn matches_category(&self, entry: &CatalogEntry) -> bool {
        self.category.is_none_or(|category| entry.category() == category)
    }

    /// Checks the price-range criterion.
    fn matches_price(&self, entry: &CatalogEntry) -> bool {
        let in_range = |price: Amount| {
            self.min_price.is_none_or(|min| price >= min)
                && self.max_price.is_none_or(|max| price <= max)
        };
        match entry.price() {
            Some(price) => in_range(price),
            // No single price: only unbounded filters match.
            None => self.min_price.is_none() && self.max_price.is_none(),
        }
    }

    /// Checks the store criterion.
    fn matches_store(&self, entry: &CatalogEntry) -> bool {
        self.store.as_ref().is_none_or(|wanted| {
            let store = match entry {
                CatalogEntry::Product(product) => product.store.as_ref(),
                CatalogEntry::Restaurant(restaurant) => restaurant.store.as_ref(),
                CatalogEntry::Car(_) | CatalogEntry::RealEstate(_) => None,
            };
            store.is_some_and(|id| id == wanted)
        })
    }
}

/// The in-memory marketplace catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// All entries, across every category.
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Creates a catalog from the given entries.
    #[inline]
    #[must_use]
    pub const fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Returns all entries.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Looks up an entry by its raw identifier string.
    #[inline]
    #[must_use]
    pub fn entry(&self, raw_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.raw_id() == raw_id)
    }

    /// Returns entries matching the given filter, in catalog order.
    #[inline]
    #[must_use]
    pub fn search(&self, filter: &CatalogFilter) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Returns all shopping products.
    #[inline]
    #[must_use]
    pub fn products(&self) -> Vec<&Product> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                CatalogEntry::Product(product) => Some(product),
                CatalogEntry::Car(_) | CatalogEntry::RealEstate(_) | CatalogEntry::Restaurant(_) => {
                    None
                }
            })
            .collect()
    }

    /// Returns all car listings.
    #[inline]
    #[must_use]
    pub fn cars(&self) -> Vec<&Car> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                CatalogEntry::Car(car) => Some(car),
                CatalogEntry::Product(_)
                | CatalogEntry::RealEstate(_)
                | CatalogEntry::Restaurant(_) => None,
            })
            .collect()
    }

    /// Returns all real estate listings.
    #[inline]
    #[must_use]
    pub fn listings(&self) -> Vec<&RealEstateListing> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                CatalogEntry::RealEstate(listing) => Some(listing),
                CatalogEntry::Product(_) | CatalogEntry::Car(_) | CatalogEntry::Restaurant(_) => {
                    None
                }
            })
            .collect()
    }

    /// Returns all restaurants.
    #[inline]
    #[must_use]
    pub fn restaurants(&self) -> Vec<&Restaurant> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                CatalogEntry::Restaurant(restaurant) => Some(restaurant),
                CatalogEntry::Product(_) | CatalogEntry::Car(_) | CatalogEntry::RealEstate(_) => {
                    None
                }
            })
            .collect()
    }

    /// Builds the sample catalog used by the CLI and the tests.
    #[inline]
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            CatalogEntry::Product(Product {
                id: ProductId::from("p1"),
                name: "Boubou brodé".to_owned(),
                price: Amount::new(15_000),
                image_url: "https://img.souk.mr/p1.jpg".to_owned(),
                store: Some(StoreId::from("store-1")),
                description: Some("Boubou traditionnel, broderie main".to_owned()),
            }),
            CatalogEntry::Product(Product {
                id: ProductId::from("p2"),
                name: "Thé vert 200g".to_owned(),
                price: Amount::new(500),
                image_url: "https://img.souk.mr/p2.jpg".to_owned(),
                store: Some(StoreId::from("store-1")),
                description: None,
            }),
            CatalogEntry::Product(Product {
                id: ProductId::from("p3"),
                name: "Dattes de l'Adrar 1kg".to_owned(),
                price: Amount::new(800),
                image_url: "https://img.souk.mr/p3.jpg".to_owned(),
                store: Some(StoreId::from("store-2")),
                description: None,
            }),
            CatalogEntry::Car(Car {
                id: CarId::from("c1"),
                make: "Toyota".to_owned(),
                model: "Hilux".to_owned(),
                year: 2019,
                price: Amount::new(4_500_000),
                image_url: "https://img.souk.mr/c1.jpg".to_owned(),
                mileage_km: Some(84_000),
                transmission: Some(Transmission::Manual),
            }),
            CatalogEntry::RealEstate(RealEstateListing {
                id: crate::models::ListingId::from("re1"),
                title: "Villa à Tevragh Zeina".to_owned(),
                price: Amount::new(90_000),
                image_url: "https://img.souk.mr/re1.jpg".to_owned(),
                kind: ListingKind::Rent,
                bedrooms: Some(4),
                bathrooms: Some(3),
                area_m2: Some(320),
                district: Some("Tevragh Zeina".to_owned()),
            }),
            CatalogEntry::Restaurant(Restaurant {
                id: RestaurantId::from("r1"),
                name: "Chez Fatimetou".to_owned(),
                image_url: "https://img.souk.mr/r1.jpg".to_owned(),
                store: Some(StoreId::from("store-r1")),
                menu: vec![
                    MenuItem {
                        id: MenuItemId::from("m1"),
                        name: "Thieboudienne".to_owned(),
                        price: Amount::new(1_500),
                        image_url: "https://img.souk.mr/m1.jpg".to_owned(),
                    },
                    MenuItem {
                        id: MenuItemId::from("m2"),
                        name: "Méchoui".to_owned(),
                        price: Amount::new(3_000),
                        image_url: "https://img.souk.mr/m2.jpg".to_owned(),
                    },
                ],
            }),
        ])
    }
}
