// ============================================================================
// WardrobeDb — Durable outfit storage (redb)
// ============================================================================
// The outfit is persisted as a single record under a fixed key.
// Default path: ~/.wardrobe/outfit.redb (override via WARDROBE_DB_PATH env var)
// ============================================================================

mod memory;

pub use memory::MemoryStorage;

use anyhow::{anyhow, Result};
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::WardrobeConfig;
use crate::outfit::OutfitRecord;

/// Storage key for the equipped outfit record
pub const OUTFIT_KEY: &str = "outfit:equipped";

const OUTFITS: TableDefinition<&str, &[u8]> = TableDefinition::new("outfits");

/// Durable key/value backend for the equipped outfit
pub trait OutfitStorage {
    /// Read the stored record, `None` when nothing has been saved yet
    fn load_outfit(&self) -> Result<Option<OutfitRecord>>;

    /// Replace the stored record
    fn save_outfit(&self, record: &OutfitRecord) -> Result<()>;
}

pub(crate) fn encode_record(record: &OutfitRecord) -> Result<Vec<u8>> {
    bincode::serialize(record).map_err(|e| anyhow!("Failed to serialize outfit: {}", e))
}

pub(crate) fn decode_record(bytes: &[u8]) -> Result<OutfitRecord> {
    bincode::deserialize(bytes).map_err(|e| anyhow!("Failed to deserialize outfit: {}", e))
}

/// Embedded database holding the persisted outfit
pub struct WardrobeDb {
    db: Database,
    path: PathBuf,
}

impl WardrobeDb {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening outfit database at: {}", path.display());

        let db = Database::create(path).map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure the table exists by doing a write transaction
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(OUTFITS)
                .map_err(|e| anyhow!("Failed to create outfits table: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Open the database configured by `config`
    pub fn open_with(config: &WardrobeConfig) -> Result<Self> {
        let path = config.resolve_db_path()?;
        Self::open(&path)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the stored outfit. Returns whether a record existed.
    pub fn clear_outfit(&self) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn
                .open_table(OUTFITS)
                .map_err(|e| anyhow!("Failed to open outfits table: {}", e))?;
            removed = table
                .remove(OUTFIT_KEY)
                .map_err(|e| anyhow!("Failed to remove outfit: {}", e))?
                .is_some();
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Cleared stored outfit");
        }
        Ok(removed)
    }

    /// Raw stored bytes, if any
    fn read_raw(&self) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(OUTFITS)
            .map_err(|e| anyhow!("Failed to open outfits table: {}", e))?;

        let value = table
            .get(OUTFIT_KEY)
            .map_err(|e| anyhow!("Failed to get outfit: {}", e))?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    pub(crate) fn write_raw(&self, bytes: &[u8]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn
                .open_table(OUTFITS)
                .map_err(|e| anyhow!("Failed to open outfits table: {}", e))?;
            table
                .insert(OUTFIT_KEY, bytes)
                .map_err(|e| anyhow!("Failed to insert outfit: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit: {}", e))?;
        Ok(())
    }
}

impl OutfitStorage for WardrobeDb {
    fn load_outfit(&self) -> Result<Option<OutfitRecord>> {
        match self.read_raw()? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_outfit(&self, record: &OutfitRecord) -> Result<()> {
        let value = encode_record(record)?;
        self.write_raw(&value)?;
        debug!("Stored outfit with {} slots", record.len());
        Ok(())
    }
}
