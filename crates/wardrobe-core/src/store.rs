//! ============================================================================
//! Outfit Store - Catalog ownership and equip state transitions
//! ============================================================================
//! The store owns the catalog and the equipped outfit. Every mutation goes
//! through `equip` / `unequip` / `reset` / `randomize` and is written to the
//! storage backend afterwards. Storage failures are logged and otherwise
//! ignored: the in-memory outfit stays authoritative.
//! ============================================================================

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{EquipPolicy, WardrobeConfig};
use crate::db::OutfitStorage;
use crate::outfit::Outfit;
use crate::types::{Category, Item, WardrobeError};

/// Catalog & outfit state for one dressing session
pub struct OutfitStore<S: OutfitStorage> {
    catalog: Catalog,
    equipped: Outfit,
    storage: S,
    policy: EquipPolicy,
}

impl<S: OutfitStorage> OutfitStore<S> {
    /// Create a store and seed the outfit from `storage`
    pub fn new(catalog: Catalog, storage: S) -> Self {
        Self::with_policy(catalog, storage, EquipPolicy::default())
    }

    pub fn with_policy(catalog: Catalog, storage: S, policy: EquipPolicy) -> Self {
        let equipped = restore(&catalog, &storage);
        info!(
            "Outfit store ready: {} catalog items, {} slots restored",
            catalog.len(),
            equipped.len()
        );
        Self {
            catalog,
            equipped,
            storage,
            policy,
        }
    }

    /// Build the catalog named by `config` (or the built-in one) and open a store
    pub fn from_config(config: &WardrobeConfig, storage: S) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path, config.scheme)?,
            None => Catalog::builtin(config.scheme),
        };
        Ok(Self::with_policy(catalog, storage, config.equip_policy))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn policy(&self) -> EquipPolicy {
        self.policy
    }

    /// Current outfit
    pub fn equipped(&self) -> &Outfit {
        &self.equipped
    }

    pub fn equipped_in(&self, category: Category) -> Option<&Item> {
        self.equipped.get(category)
    }

    /// Catalog items in any of `categories`, in catalog order
    pub fn items_for<I>(&self, categories: I) -> Vec<&Item>
    where
        I: IntoIterator<Item = Category>,
    {
        self.catalog.items_for(categories)
    }

    /// Whether the item's slot holds an item with the same asset name
    pub fn is_equipped(&self, item: &Item) -> bool {
        self.equipped
            .get(item.category)
            .is_some_and(|worn| worn.asset_name == item.asset_name)
    }

    /// Asset names to composite back-to-front
    pub fn layers(&self) -> Vec<&str> {
        self.equipped.layers()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Put `item` in its slot, replacing whatever was there
    pub fn equip(&mut self, item: &Item) -> Result<(), WardrobeError> {
        if !self.catalog.scheme().contains(item.category) {
            return Err(WardrobeError::UnknownCategory(item.category.to_string()));
        }
        if self.policy == EquipPolicy::CatalogOnly && !self.catalog.contains(item) {
            return Err(WardrobeError::NotInCatalog(item.asset_name.clone()));
        }

        if let Some(previous) = self.equipped.set(item.clone()) {
            debug!("Replaced {} in {} slot", previous.asset_name, item.category);
        }
        debug!("Equipped {} ({})", item.asset_name, item.category);
        self.persist();
        Ok(())
    }

    /// Empty the slot `category` occupies under the catalog's scheme.
    /// With hair folded into hat, unequipping hair empties the hat slot.
    pub fn unequip(&mut self, category: Category) {
        let category = self.catalog.scheme().resolve(category);
        if let Some(removed) = self.equipped.remove(category) {
            debug!("Unequipped {} ({})", removed.asset_name, category);
        }
        self.persist();
    }

    /// Tap handler: unequip if worn, equip otherwise.
    /// Returns whether the item is worn afterwards.
    pub fn toggle(&mut self, item: &Item) -> Result<bool, WardrobeError> {
        if self.is_equipped(item) {
            self.unequip(item.category);
            Ok(false)
        } else {
            self.equip(item)?;
            Ok(true)
        }
    }

    /// Clear every slot
    pub fn reset(&mut self) {
        self.equipped.clear();
        debug!("Outfit reset");
        self.persist();
    }

    /// Randomize using thread-local entropy
    pub fn randomize(&mut self) {
        let mut rng = rand::thread_rng();
        self.randomize_with(&mut rng);
    }

    /// Replace the whole outfit with a random one.
    /// Each slot gets a uniform pick from its catalog items, kept on a coin flip;
    /// top and bottom are kept whenever they have options.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        let mut next = Outfit::new();

        for &category in self.catalog.scheme().slots() {
            let options = self.catalog.items_for([category]);
            let Some(pick) = options.choose(rng) else {
                continue;
            };
            if category.is_anchor() || rng.gen_bool(0.5) {
                next.set((*pick).clone());
            }
        }

        self.equipped = next;
        debug!("Randomized outfit: {:?}", self.equipped.layers());
        self.persist();
    }

    /// Re-read the outfit from storage, discarding in-memory state
    pub fn reload(&mut self) {
        self.equipped = restore(&self.catalog, &self.storage);
    }

    fn persist(&self) {
        let record = self.equipped.to_record();
        match self.storage.save_outfit(&record) {
            Ok(()) => debug!("Persisted outfit ({} slots)", record.len()),
            Err(e) => warn!("Failed to persist outfit: {} - keeping in-memory state", e),
        }
    }
}

fn restore<S: OutfitStorage>(catalog: &Catalog, storage: &S) -> Outfit {
    match storage.load_outfit() {
        Ok(Some(record)) => Outfit::from_record(&record, catalog),
        Ok(None) => Outfit::new(),
        Err(e) => {
            warn!("Failed to load saved outfit: {} - starting empty", e);
            Outfit::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::config::CategoryScheme;
    use crate::db::{MemoryStorage, WardrobeDb};
    use crate::outfit::OutfitRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> OutfitStore<MemoryStorage> {
        OutfitStore::new(Catalog::builtin(CategoryScheme::Full), MemoryStorage::new())
    }

    fn item(store: &OutfitStore<MemoryStorage>, asset: &str) -> Item {
        store.catalog().find_asset(asset).unwrap().clone()
    }

    fn minimal_catalog() -> Catalog {
        Catalog::new(
            vec![
                CatalogEntry::new("t1", Category::Top),
                CatalogEntry::new("b1", Category::Bottom),
            ],
            CategoryScheme::Full,
        )
        .unwrap()
    }

    #[test]
    fn test_equip_then_unequip() {
        let mut store = store();
        let shirt = item(&store, "striped_shirt");

        store.equip(&shirt).unwrap();
        assert!(store.is_equipped(&shirt));
        assert_eq!(store.equipped_in(Category::Top), Some(&shirt));

        store.unequip(Category::Top);
        assert!(!store.is_equipped(&shirt));
        assert!(store.equipped().is_empty());
    }

    #[test]
    fn test_last_equip_wins_within_category() {
        let mut store = store();
        let hat_a = item(&store, "red_ball_cap");
        let hat_b = item(&store, "straw_sun_hat");

        store.equip(&hat_a).unwrap();
        store.equip(&hat_b).unwrap();

        assert!(!store.is_equipped(&hat_a));
        assert!(store.is_equipped(&hat_b));
        assert_eq!(store.equipped().len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_slot() {
        let mut store = store();
        let jeans = item(&store, "blue_jeans");
        let skirt = item(&store, "plaid_skirt");

        // From empty
        assert!(store.toggle(&jeans).unwrap());
        assert!(!store.toggle(&jeans).unwrap());
        assert!(store.equipped_in(Category::Bottom).is_none());

        // From occupied by another item: first toggle replaces, second empties
        store.equip(&skirt).unwrap();
        assert!(store.toggle(&jeans).unwrap());
        assert!(!store.toggle(&jeans).unwrap());
        assert!(store.equipped_in(Category::Bottom).is_none());

        // From occupied by the same item
        store.equip(&jeans).unwrap();
        let before = store.equipped().clone();
        store.toggle(&jeans).unwrap();
        store.toggle(&jeans).unwrap();
        assert_eq!(store.equipped(), &before);
    }

    #[test]
    fn test_is_equipped_compares_asset_name() {
        let mut store = store();
        let boots = item(&store, "rain_boots");
        store.equip(&boots).unwrap();

        let lookalike = Item::new("rain_boots", Category::Shoes);
        assert!(store.is_equipped(&lookalike));

        let other_slot = Item::new("rain_boots", Category::Accessory);
        assert!(!store.is_equipped(&other_slot));
    }

    #[test]
    fn test_unequip_empty_slot_is_noop() {
        let mut store = store();
        store.unequip(Category::Hat);
        assert!(store.equipped().is_empty());
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_reset_clears_every_slot() {
        let mut store = store();
        for asset in ["striped_shirt", "blue_jeans", "pigtails", "round_glasses"] {
            let it = item(&store, asset);
            store.equip(&it).unwrap();
        }
        assert_eq!(store.equipped().len(), 4);

        store.reset();
        assert!(store.equipped().is_empty());
        assert!(!store.items_for(Category::ALL).is_empty());
        assert_eq!(store.storage().record(), Some(OutfitRecord::default()));
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = store();
        let cap = item(&store, "red_ball_cap");

        store.equip(&cap).unwrap();
        assert_eq!(store.storage().writes(), 1);
        assert_eq!(store.storage().record().unwrap().get("hat"), Some("red_ball_cap"));

        store.unequip(Category::Hat);
        store.toggle(&cap).unwrap();
        store.reset();
        store.randomize_with(&mut StdRng::seed_from_u64(1));
        assert_eq!(store.storage().writes(), 5);
        assert_eq!(store.storage().record().unwrap(), store.equipped().to_record());
    }

    #[test]
    fn test_persistence_roundtrip_into_fresh_store() {
        let catalog = Catalog::builtin(CategoryScheme::Full);
        let storage = MemoryStorage::new();

        let mut first = OutfitStore::new(catalog.clone(), storage.clone());
        for asset in ["denim_jacket", "cargo_shorts", "curly_bob", "red_sneakers"] {
            let it = catalog.find_asset(asset).unwrap().clone();
            first.equip(&it).unwrap();
        }

        let second = OutfitStore::new(catalog, storage);
        assert_eq!(second.equipped(), first.equipped());
        assert_eq!(
            second.layers(),
            vec!["cargo_shorts", "denim_jacket", "red_sneakers", "curly_bob"]
        );
    }

    #[test]
    fn test_stale_record_entries_are_dropped() {
        let mut record = OutfitRecord::default();
        record.insert_raw("top", "t1");
        record.insert_raw("bottom", "retired_pants");
        record.insert_raw("cape", "velvet");
        let storage = MemoryStorage::with_record(&record).unwrap();

        let store = OutfitStore::new(minimal_catalog(), storage);
        assert_eq!(store.equipped().len(), 1);
        assert_eq!(store.equipped_in(Category::Top).unwrap().asset_name, "t1");
    }

    #[test]
    fn test_corrupt_record_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set_raw(vec![0xde, 0xad]);

        let store = OutfitStore::new(minimal_catalog(), storage);
        assert!(store.equipped().is_empty());
    }

    #[test]
    fn test_unavailable_storage_is_not_fatal() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);

        let mut store = OutfitStore::new(minimal_catalog(), storage);
        let top = store.catalog().find_asset("t1").unwrap().clone();
        store.equip(&top).unwrap();
        assert!(store.is_equipped(&top));
        assert_eq!(store.storage().writes(), 0);

        // Storage comes back: the next write carries the in-memory state
        store.storage().set_unavailable(false);
        store.unequip(Category::Hat);
        assert_eq!(store.storage().record().unwrap().get("top"), Some("t1"));
    }

    #[test]
    fn test_reload_reads_storage() {
        let storage = MemoryStorage::new();
        let mut store = OutfitStore::new(minimal_catalog(), storage.clone());
        let top = store.catalog().find_asset("t1").unwrap().clone();
        store.equip(&top).unwrap();

        storage.save_outfit(&OutfitRecord::default()).unwrap();
        store.reload();
        assert!(store.equipped().is_empty());
    }

    #[test]
    fn test_permissive_policy_accepts_foreign_items() {
        let mut store = store();
        let tiara = Item::new("tiara", Category::Hat);
        store.equip(&tiara).unwrap();
        assert!(store.is_equipped(&tiara));

        // Not restorable: the catalog has no such item
        let restored = OutfitStore::new(store.catalog().clone(), store.storage().clone());
        assert!(restored.equipped_in(Category::Hat).is_none());
    }

    #[test]
    fn test_strict_policy_rejects_foreign_items() {
        let mut store = OutfitStore::with_policy(
            Catalog::builtin(CategoryScheme::Full),
            MemoryStorage::new(),
            EquipPolicy::CatalogOnly,
        );
        let tiara = Item::new("tiara", Category::Hat);
        assert_eq!(
            store.equip(&tiara),
            Err(WardrobeError::NotInCatalog("tiara".into()))
        );
        assert!(store.toggle(&tiara).is_err());
        assert!(store.equipped().is_empty());
        assert_eq!(store.storage().writes(), 0);

        let cap = item(&store, "red_ball_cap");
        assert!(store.toggle(&cap).unwrap());
    }

    #[test]
    fn test_equip_outside_scheme_rejected() {
        let mut store = OutfitStore::new(
            Catalog::builtin(CategoryScheme::FoldedHair),
            MemoryStorage::new(),
        );
        let bun = Item::new("bun", Category::Hair);
        assert!(matches!(store.equip(&bun), Err(WardrobeError::UnknownCategory(_))));

        // Catalog hair items already live in the hat slot
        let pigtails = item(&store, "pigtails");
        assert_eq!(pigtails.category, Category::Hat);
        store.equip(&pigtails).unwrap();
        assert_eq!(store.layers(), vec!["pigtails"]);
    }

    #[test]
    fn test_unequip_hair_under_folded_scheme_empties_hat() {
        let mut store = OutfitStore::new(
            Catalog::builtin(CategoryScheme::FoldedHair),
            MemoryStorage::new(),
        );
        let pigtails = item(&store, "pigtails");
        store.equip(&pigtails).unwrap();

        store.unequip(Category::Hair);
        assert!(store.equipped().is_empty());
        assert!(!store.is_equipped(&pigtails));
        assert_eq!(store.storage().record(), Some(OutfitRecord::default()));
    }

    #[test]
    fn test_redb_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outfit.redb");
        let catalog = Catalog::builtin(CategoryScheme::Full);

        let saved = {
            let mut first = OutfitStore::new(catalog.clone(), WardrobeDb::open(&path).unwrap());
            for asset in ["yellow_hoodie", "plaid_skirt", "straw_sun_hat", "star_backpack"] {
                let it = catalog.find_asset(asset).unwrap().clone();
                first.equip(&it).unwrap();
            }
            first.unequip(Category::Accessory);
            first.equipped().clone()
        };

        let second = OutfitStore::new(catalog, WardrobeDb::open(&path).unwrap());
        assert_eq!(second.equipped(), &saved);
        assert_eq!(second.layers(), vec!["plaid_skirt", "yellow_hoodie", "straw_sun_hat"]);
    }

    #[test]
    fn test_redb_corrupt_record_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outfit.redb");
        {
            let db = WardrobeDb::open(&path).unwrap();
            db.write_raw(&[0xde, 0xad]).unwrap();
        }

        let mut store = OutfitStore::new(minimal_catalog(), WardrobeDb::open(&path).unwrap());
        assert!(store.equipped().is_empty());

        // The next mutation overwrites the bad record
        let top = store.catalog().find_asset("t1").unwrap().clone();
        store.equip(&top).unwrap();
        let reopened = store.storage().load_outfit().unwrap().unwrap();
        assert_eq!(reopened.get("top"), Some("t1"));
    }

    #[test]
    fn test_randomize_always_fills_anchors() {
        let mut store = OutfitStore::new(minimal_catalog(), MemoryStorage::new());

        for seed in 0..50 {
            store.randomize_with(&mut StdRng::seed_from_u64(seed));
            assert_eq!(store.equipped_in(Category::Top).unwrap().asset_name, "t1");
            assert_eq!(store.equipped_in(Category::Bottom).unwrap().asset_name, "b1");
            assert!(store.equipped_in(Category::Hat).is_none());
            assert_eq!(store.equipped().len(), 2);
        }
    }

    #[test]
    fn test_randomize_optional_slots_vary() {
        let mut store = store();
        let mut hat_seen = false;
        let mut hat_missing = false;

        for seed in 0..200 {
            store.randomize_with(&mut StdRng::seed_from_u64(seed));
            assert!(store.equipped_in(Category::Top).is_some());
            assert!(store.equipped_in(Category::Bottom).is_some());
            match store.equipped_in(Category::Hat) {
                Some(_) => hat_seen = true,
                None => hat_missing = true,
            }
        }

        assert!(hat_seen && hat_missing);
    }

    #[test]
    fn test_randomize_is_deterministic_per_seed() {
        let mut a = store();
        let mut b = OutfitStore::new(a.catalog().clone(), MemoryStorage::new());

        a.randomize_with(&mut StdRng::seed_from_u64(42));
        b.randomize_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.equipped(), b.equipped());
    }

    #[test]
    fn test_randomize_replaces_previous_outfit() {
        let mut store = OutfitStore::new(minimal_catalog(), MemoryStorage::new());
        let scarf = Item::new("scarf", Category::Accessory);
        store.equip(&scarf).unwrap();

        store.randomize_with(&mut StdRng::seed_from_u64(7));
        assert!(store.equipped_in(Category::Accessory).is_none());
        assert!(store.equipped().iter().all(|it| store.catalog().contains(it)));
    }

    #[test]
    fn test_randomize_with_empty_catalog() {
        let catalog = Catalog::new(Vec::<CatalogEntry>::new(), CategoryScheme::Full).unwrap();
        let mut store = OutfitStore::new(catalog, MemoryStorage::new());
        store.randomize();
        assert!(store.equipped().is_empty());
    }

    #[test]
    fn test_from_config_with_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"asset_name": "tee", "category": "top"},
                {"asset_name": "bun", "category": "hair"}
            ]"#,
        )
        .unwrap();

        let config = WardrobeConfig {
            catalog_path: Some(path),
            scheme: CategoryScheme::FoldedHair,
            equip_policy: EquipPolicy::CatalogOnly,
            ..WardrobeConfig::default()
        };
        let store = OutfitStore::from_config(&config, MemoryStorage::new()).unwrap();
        assert_eq!(store.catalog().len(), 2);
        assert_eq!(store.policy(), EquipPolicy::CatalogOnly);
        assert_eq!(store.items_for([Category::Hat]).len(), 1);
    }
}
