//! ============================================================================
//! WARDROBE-CORE: Paper-doll outfit state
//! ============================================================================
//! This crate holds the logic behind the outfit composer UI:
//! - Item catalog with category filtering
//! - Outfit store: equip / unequip / toggle / reset / randomize
//! - Durable outfit persistence via redb
//! - Scroll affordance tracking for item lists
//! ============================================================================

pub mod catalog;
pub mod config;
pub mod db;
pub mod outfit;
pub mod store;
pub mod types;
pub mod viewport;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogEntry};
pub use config::{CategoryScheme, EquipPolicy, WardrobeConfig};
pub use db::{MemoryStorage, OutfitStorage, WardrobeDb, OUTFIT_KEY};
pub use outfit::{Outfit, OutfitRecord};
pub use store::OutfitStore;
pub use types::*;
pub use viewport::{Affordances, ViewportTracker, DEFAULT_SCROLL_THRESHOLD};
