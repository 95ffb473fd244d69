use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::IntegrityRecord;
use crate::error::{Result, ThumbprintError};

/// Identity of a compiled item (typically the template's relative path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledItemId(String);

impl CompiledItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompiledItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompiledItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Side-table associating compiled items with their sealed integrity records.
///
/// Each item has at most one record. Records are sealed on registration and
/// handed out as `Arc`s, so readers on any thread share them without locking.
#[derive(Debug, Clone, Default)]
pub struct IntegrityRegistry {
    records: BTreeMap<CompiledItemId, Arc<IntegrityRecord>>,
}

impl IntegrityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the record for `id`, sealing it if it is still building.
    pub fn register(&mut self, id: CompiledItemId, mut record: IntegrityRecord) -> Result<()> {
        if self.records.contains_key(&id) {
            return Err(ThumbprintError::DuplicateItem(id.to_string()));
        }
        record.seal();
        self.records.insert(id, Arc::new(record));
        Ok(())
    }

    pub fn get(&self, id: &CompiledItemId) -> Option<Arc<IntegrityRecord>> {
        self.records.get(id).cloned()
    }

    /// Registered items ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&CompiledItemId, &Arc<IntegrityRecord>)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
