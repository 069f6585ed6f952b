// ============================================================================
// In-memory outfit storage for tests and ephemeral sessions
// ============================================================================

use anyhow::{anyhow, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{decode_record, encode_record, OutfitStorage};
use crate::outfit::OutfitRecord;

/// Shared in-memory backend. Clones see the same stored bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bytes: Rc<RefCell<Option<Vec<u8>>>>,
    fail_io: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a record
    pub fn with_record(record: &OutfitRecord) -> Result<Self> {
        let storage = Self::new();
        storage.save_outfit(record)?;
        storage.writes.set(0);
        Ok(storage)
    }

    /// Currently stored record, if it decodes
    pub fn record(&self) -> Option<OutfitRecord> {
        self.bytes
            .borrow()
            .as_deref()
            .and_then(|bytes| decode_record(bytes).ok())
    }

    /// Overwrite the stored bytes verbatim
    pub fn set_raw(&self, bytes: Vec<u8>) {
        *self.bytes.borrow_mut() = Some(bytes);
    }

    /// Make every subsequent read and write fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail_io.set(unavailable);
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl OutfitStorage for MemoryStorage {
    fn load_outfit(&self) -> Result<Option<OutfitRecord>> {
        if self.fail_io.get() {
            return Err(anyhow!("Storage unavailable"));
        }
        match self.bytes.borrow().as_deref() {
            Some(bytes) => Ok(Some(decode_record(bytes)?)),
            None => Ok(None),
        }
    }

    fn save_outfit(&self, record: &OutfitRecord) -> Result<()> {
        if self.fail_io.get() {
            return Err(anyhow!("Storage unavailable"));
        }
        let bytes = encode_record(record)?;
        *self.bytes.borrow_mut() = Some(bytes);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
