//! ============================================================================
//! Catalog - The fixed universe of selectable items
//! ============================================================================
//! Built once at startup from the built-in table or a JSON file and never
//! mutated afterwards. Category filtering preserves catalog order.
//! ============================================================================

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::config::CategoryScheme;
use crate::types::{Category, Item, WardrobeError};

/// Catalog entry as declared in a catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub asset_name: String,
    pub category: Category,
}

impl CatalogEntry {
    pub fn new(asset_name: impl Into<String>, category: Category) -> Self {
        Self {
            asset_name: asset_name.into(),
            category,
        }
    }
}

/// Default wardrobe shipped with the app
pub const BUILTIN_CATALOG: &[(&str, Category)] = &[
    ("striped_shirt", Category::Top),
    ("yellow_hoodie", Category::Top),
    ("denim_jacket", Category::Top),
    ("blue_jeans", Category::Bottom),
    ("plaid_skirt", Category::Bottom),
    ("cargo_shorts", Category::Bottom),
    ("red_ball_cap", Category::Hat),
    ("straw_sun_hat", Category::Hat),
    ("pigtails", Category::Hair),
    ("curly_bob", Category::Hair),
    ("red_sneakers", Category::Shoes),
    ("rain_boots", Category::Shoes),
    ("round_glasses", Category::Accessory),
    ("star_backpack", Category::Accessory),
];

/// Immutable item catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    scheme: CategoryScheme,
}

impl Catalog {
    /// Validate entries and assign each one a fresh identity.
    /// Categories are mapped through `scheme`, so folded hair lands on the hat slot.
    pub fn new<I>(entries: I, scheme: CategoryScheme) -> Result<Self, WardrobeError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut seen: HashSet<(Category, String)> = HashSet::new();
        let mut items = Vec::new();

        for entry in entries {
            let asset_name = entry.asset_name.trim().to_string();
            if asset_name.is_empty() {
                return Err(WardrobeError::InvalidCatalog(format!(
                    "empty asset name in category {}",
                    entry.category
                )));
            }

            let category = scheme.resolve(entry.category);
            if !seen.insert((category, asset_name.clone())) {
                return Err(WardrobeError::DuplicateItem {
                    category,
                    asset: asset_name,
                });
            }

            items.push(Item::new(asset_name, category));
        }

        debug!("Catalog built with {} items ({:?})", items.len(), scheme);
        Ok(Self { items, scheme })
    }

    /// The built-in default catalog
    pub fn builtin(scheme: CategoryScheme) -> Self {
        // Built-in asset names are unique, so no validation pass is needed
        let items = BUILTIN_CATALOG
            .iter()
            .map(|(asset, category)| Item::new(*asset, scheme.resolve(*category)))
            .collect();
        Self { items, scheme }
    }

    /// Parse a JSON array of `{ "asset_name": ..., "category": ... }`
    pub fn from_json_str(json: &str, scheme: CategoryScheme) -> Result<Self, WardrobeError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| WardrobeError::InvalidCatalog(e.to_string()))?;
        Self::new(entries, scheme)
    }

    pub fn from_json_file(path: &Path, scheme: CategoryScheme) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read catalog {}: {}", path.display(), e))?;
        let catalog = Self::from_json_str(&json, scheme)
            .map_err(|e| anyhow!("Failed to load catalog {}: {}", path.display(), e))?;
        info!("Loaded {} catalog items from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn scheme(&self) -> CategoryScheme {
        self.scheme
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose category is in `categories`, in catalog order
    pub fn items_for<I>(&self, categories: I) -> Vec<&Item>
    where
        I: IntoIterator<Item = Category>,
    {
        let mut wanted = [false; Category::COUNT];
        for category in categories {
            wanted[category.index()] = true;
        }

        self.items
            .iter()
            .filter(|item| wanted[item.category.index()])
            .collect()
    }

    /// First item matching both category and asset name
    pub fn find(&self, category: Category, asset_name: &str) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| item.category == category && item.asset_name == asset_name)
    }

    /// First item with the given asset name, in any category
    pub fn find_asset(&self, asset_name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.asset_name == asset_name)
    }

    /// Whether an item with the same category and asset name is in the catalog
    pub fn contains(&self, item: &Item) -> bool {
        self.find(item.category, &item.asset_name).is_some()
    }

    /// Categories with at least one item, in enumeration order
    pub fn categories_present(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.items.iter().any(|item| item.category == *category))
            .collect()
    }
}
