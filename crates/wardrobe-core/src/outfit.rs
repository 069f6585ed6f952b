//! ============================================================================
//! Outfit - Per-category slot table and its persisted record
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::catalog::Catalog;
use crate::types::{Category, Item};

/// Current equip state: one optional item per category slot.
/// An item always sits in the slot of its own category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outfit {
    slots: [Option<Item>; Category::COUNT],
}

impl Outfit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&Item> {
        self.slots[category.index()].as_ref()
    }

    /// Put `item` into its category's slot, returning the previous occupant
    pub(crate) fn set(&mut self, item: Item) -> Option<Item> {
        let index = item.category.index();
        self.slots[index].replace(item)
    }

    pub(crate) fn remove(&mut self, category: Category) -> Option<Item> {
        self.slots[category.index()].take()
    }

    pub(crate) fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Equipped items in category order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    /// Asset names to draw back-to-front over the base figure
    pub fn layers(&self) -> Vec<&str> {
        Category::LAYER_ORDER
            .iter()
            .filter_map(|category| self.get(*category))
            .map(|item| item.asset_name.as_str())
            .collect()
    }

    /// Encode as a category-name -> asset-name record
    pub fn to_record(&self) -> OutfitRecord {
        let mut record = OutfitRecord::default();
        for item in self.iter() {
            record.insert(item.category, &item.asset_name);
        }
        record
    }

    /// Rebuild an outfit from a record, keeping only entries that resolve
    /// to an item in `catalog`. Unknown categories and stale assets are dropped.
    pub fn from_record(record: &OutfitRecord, catalog: &Catalog) -> Self {
        let mut outfit = Self::new();

        for (category_name, asset_name) in record.iter() {
            let category = match category_name.parse::<Category>() {
                Ok(category) if catalog.scheme().contains(category) => category,
                _ => {
                    warn!("Skipping unrecognized outfit category '{}'", category_name);
                    continue;
                }
            };

            match catalog.find(category, asset_name) {
                Some(item) => {
                    outfit.set(item.clone());
                }
                None => warn!(
                    "Skipping stale outfit entry {} = '{}' (not in catalog)",
                    category, asset_name
                ),
            }
        }

        outfit
    }
}

/// Durable encoding of an outfit: category name -> asset name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutfitRecord(BTreeMap<String, String>);

impl OutfitRecord {
    pub fn insert(&mut self, category: Category, asset_name: &str) {
        self.0.insert(category.as_str().to_string(), asset_name.to_string());
    }

    /// Insert a raw pair without validating the category name
    pub fn insert_raw(&mut self, category_name: impl Into<String>, asset_name: impl Into<String>) {
        self.0.insert(category_name.into(), asset_name.into());
    }

    pub fn get(&self, category_name: &str) -> Option<&str> {
        self.0.get(category_name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
