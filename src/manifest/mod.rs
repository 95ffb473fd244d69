//! JSON persistence for the integrity registry.
//!
//! ```json
//! {
//!   "version": 1,
//!   "generated_at": "2026-01-01T00:00:00Z",
//!   "items": {
//!     "views/index.tpl": [
//!       { "hash_algorithm": "sha256", "thumbprint": "2cf2…", "kind": "template", "identifier": "views/index.tpl" }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThumbprintError};
use crate::model::{CompiledItemId, IntegrityRecord, IntegrityRegistry};

pub const MANIFEST_VERSION: u32 = 1;

/// On-disk form of an `IntegrityRegistry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: BTreeMap<CompiledItemId, IntegrityRecord>,
}

impl Manifest {
    /// Snapshot a registry, stamped with the current time.
    pub fn from_registry(registry: &IntegrityRegistry) -> Self {
        Self {
            version: MANIFEST_VERSION,
            generated_at: Some(Utc::now()),
            items: registry
                .iter()
                .map(|(id, record)| (id.clone(), IntegrityRecord::clone(record)))
                .collect(),
        }
    }

    /// Parse a manifest from JSON text. `origin` names the source in errors.
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|e| ThumbprintError::Manifest {
                file: origin.to_string(),
                message: e.to_string(),
            })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ThumbprintError::Manifest {
                file: origin.to_string(),
                message: format!(
                    "unsupported manifest version {} (expected {})",
                    manifest.version, MANIFEST_VERSION
                ),
            });
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Build a registry holding every item of this manifest.
    pub fn into_registry(self) -> Result<IntegrityRegistry> {
        let mut registry = IntegrityRegistry::new();
        for (id, record) in self.items {
            registry.register(id, record)?;
        }
        Ok(registry)
    }
}
