//! ============================================================================
//! Wardrobe Config - Environment-driven settings for the outfit core
//! ============================================================================
//! Variables:
//! - WARDROBE_DB_PATH          durable outfit database (default ~/.wardrobe/outfit.redb)
//! - WARDROBE_CATALOG          JSON catalog file (default: built-in catalog)
//! - WARDROBE_FOLD_HAIR        fold the hair slot into the hat slot
//! - WARDROBE_STRICT_CATALOG   reject equips of items missing from the catalog
//! - WARDROBE_SCROLL_THRESHOLD scroll hint hysteresis, in layout units
//! ============================================================================

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::types::Category;
use crate::viewport::DEFAULT_SCROLL_THRESHOLD;

const FULL_SLOTS: [Category; 6] = Category::ALL;

const FOLDED_HAIR_SLOTS: [Category; 5] = [
    Category::Top,
    Category::Bottom,
    Category::Hat,
    Category::Shoes,
    Category::Accessory,
];

/// Which categories exist as equip slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScheme {
    /// Six slots, hair separate from hat
    #[default]
    Full,
    /// Five slots, hair items occupy the hat slot
    FoldedHair,
}

impl CategoryScheme {
    /// Active slots, in enumeration order
    pub fn slots(self) -> &'static [Category] {
        match self {
            CategoryScheme::Full => &FULL_SLOTS,
            CategoryScheme::FoldedHair => &FOLDED_HAIR_SLOTS,
        }
    }

    pub fn contains(self, category: Category) -> bool {
        self.slots().contains(&category)
    }

    /// Map a declared category onto the slot it occupies under this scheme
    pub fn resolve(self, category: Category) -> Category {
        match (self, category) {
            (CategoryScheme::FoldedHair, Category::Hair) => Category::Hat,
            (_, category) => category,
        }
    }
}

/// Whether equip accepts items that are not part of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipPolicy {
    #[default]
    Permissive,
    CatalogOnly,
}

/// Wardrobe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeConfig {
    pub db_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub scheme: CategoryScheme,
    pub equip_policy: EquipPolicy,
    pub scroll_threshold: f64,
}

impl Default for WardrobeConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            catalog_path: None,
            scheme: CategoryScheme::default(),
            equip_policy: EquipPolicy::default(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

impl WardrobeConfig {
    /// Build config from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.db_path = lookup("WARDROBE_DB_PATH").map(PathBuf::from);
        config.catalog_path = lookup("WARDROBE_CATALOG").map(PathBuf::from);

        if lookup("WARDROBE_FOLD_HAIR").as_deref().map(parse_flag) == Some(true) {
            config.scheme = CategoryScheme::FoldedHair;
        }
        if lookup("WARDROBE_STRICT_CATALOG").as_deref().map(parse_flag) == Some(true) {
            config.equip_policy = EquipPolicy::CatalogOnly;
        }

        if let Some(raw) = lookup("WARDROBE_SCROLL_THRESHOLD") {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => config.scroll_threshold = value,
                _ => warn!(
                    "Ignoring WARDROBE_SCROLL_THRESHOLD={:?}, using {}",
                    raw, DEFAULT_SCROLL_THRESHOLD
                ),
            }
        }

        config
    }

    /// Resolve the database path, creating ~/.wardrobe when falling back to it
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        let wardrobe_dir = home.join(".wardrobe");
        std::fs::create_dir_all(&wardrobe_dir)
            .map_err(|e| anyhow!("Failed to create .wardrobe directory: {}", e))?;
        Ok(wardrobe_dir.join("outfit.redb"))
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
