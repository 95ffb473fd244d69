use serde::{Deserialize, Serialize};

use super::Thumbprint;
use crate::error::{Result, ThumbprintError};

/// Lifecycle state of an `IntegrityRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Building,
    Sealed,
}

/// Ordered thumbprints attached to one compiled item.
///
/// Append-only while `Building`, frozen once sealed. Attachment order is
/// preserved and is what audit output shows. Exact duplicates are rejected
/// with `DuplicateThumbprint` rather than silently dropped.
///
/// A building record is single-writer: `attach` takes `&mut self`, so
/// callers that share one across threads must synchronize externally. A
/// sealed record is immutable and can be shared freely behind an `Arc`.
///
/// Serializes as its thumbprint list; deserializes as a sealed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Thumbprint>", into = "Vec<Thumbprint>")]
pub struct IntegrityRecord {
    thumbprints: Vec<Thumbprint>,
    state: RecordState,
}

impl IntegrityRecord {
    /// Create an empty record in the building state.
    pub fn new() -> Self {
        Self {
            thumbprints: Vec::new(),
            state: RecordState::Building,
        }
    }

    /// Attach every thumbprint in order, then seal.
    pub fn sealed_from<I>(thumbprints: I) -> Result<Self>
    where
        I: IntoIterator<Item = Thumbprint>,
    {
        let mut record = Self::new();
        for thumbprint in thumbprints {
            record.attach(thumbprint)?;
        }
        record.seal();
        Ok(record)
    }

    /// Append a thumbprint while the record is still building.
    pub fn attach(&mut self, thumbprint: Thumbprint) -> Result<()> {
        if self.state == RecordState::Sealed {
            return Err(ThumbprintError::RecordSealed);
        }
        if self.thumbprints.contains(&thumbprint) {
            return Err(ThumbprintError::DuplicateThumbprint(thumbprint.to_string()));
        }
        self.thumbprints.push(thumbprint);
        Ok(())
    }

    /// Freeze the record. Sealing an already sealed record is a no-op.
    pub fn seal(&mut self) {
        self.state = RecordState::Sealed;
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn is_sealed(&self) -> bool {
        self.state == RecordState::Sealed
    }

    /// Thumbprints whose identifier equals `identifier`, in attachment order.
    ///
    /// `None` selects thumbprints with no identifier. The iterator is
    /// `Clone`, so it can be restarted without touching the record.
    pub fn thumbprints_for<'a>(
        &'a self,
        identifier: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Thumbprint> + Clone + 'a {
        self.thumbprints
            .iter()
            .filter(move |t| t.identifier() == identifier)
    }

    /// All thumbprints in attachment order.
    pub fn all(&self) -> &[Thumbprint] {
        &self.thumbprints
    }

    pub fn len(&self) -> usize {
        self.thumbprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbprints.is_empty()
    }
}

impl Default for IntegrityRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Thumbprint>> for IntegrityRecord {
    type Error = ThumbprintError;

    fn try_from(thumbprints: Vec<Thumbprint>) -> Result<Self> {
        Self::sealed_from(thumbprints)
    }
}

impl From<IntegrityRecord> for Vec<Thumbprint> {
    fn from(record: IntegrityRecord) -> Self {
        record.thumbprints
    }
}
