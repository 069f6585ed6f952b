//! ============================================================================
//! Wardrobe Types - Categories, items, and errors shared across the core
//! ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Categories
// ============================================================================

/// Equip slot category. At most one item per category is worn at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Hat,
    Hair,
    Shoes,
    Accessory,
}

impl Category {
    /// Number of categories in the enumeration
    pub const COUNT: usize = 6;

    /// Every category, in declaration order
    pub const ALL: [Category; Category::COUNT] = [
        Category::Top,
        Category::Bottom,
        Category::Hat,
        Category::Hair,
        Category::Shoes,
        Category::Accessory,
    ];

    /// Back-to-front compositing order.
    /// Clothing is drawn under hair, hair is drawn under hats.
    pub const LAYER_ORDER: [Category; Category::COUNT] = [
        Category::Bottom,
        Category::Top,
        Category::Shoes,
        Category::Accessory,
        Category::Hair,
        Category::Hat,
    ];

    /// Slot index into fixed-size tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Hat => "hat",
            Category::Hair => "hair",
            Category::Shoes => "shoes",
            Category::Accessory => "accessory",
        }
    }

    /// Top and bottom anchor the look: randomize always fills them when it can
    pub fn is_anchor(self) -> bool {
        matches!(self, Category::Top | Category::Bottom)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Category::Top),
            "bottom" => Ok(Category::Bottom),
            "hat" => Ok(Category::Hat),
            "hair" => Ok(Category::Hair),
            "shoes" => Ok(Category::Shoes),
            "accessory" => Ok(Category::Accessory),
            _ => Err(WardrobeError::UnknownCategory(s.to_string())),
        }
    }
}

// ============================================================================
// Items
// ============================================================================

/// Opaque identity of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable piece of clothing.
/// `asset_name` is resolved to an image by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub asset_name: String,
    pub category: Category,
}

impl Item {
    /// Create an item with a fresh identity
    pub fn new(asset_name: impl Into<String>, category: Category) -> Self {
        Self {
            id: ItemId::new(),
            asset_name: asset_name.into(),
            category,
        }
    }

    /// Human-readable label derived from the asset name
    pub fn display_name(&self) -> String {
        display_label(&self.asset_name)
    }
}

/// Normalize an asset name into a label: `red_ball-cap` -> `Red Ball Cap`
pub fn display_label(asset_name: &str) -> String {
    asset_name
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Errors
// ============================================================================

/// Error types for the wardrobe core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WardrobeError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Item not in catalog: {0}")]
    NotInCatalog(String),

    #[error("Duplicate catalog item '{asset}' in category {category}")]
    DuplicateItem { category: Category, asset: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}
