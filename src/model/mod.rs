//! Integrity metadata model.
//!
//! A `Thumbprint` is one hash fact about one source contribution. An
//! `IntegrityRecord` collects the thumbprints of one compiled item, and the
//! `IntegrityRegistry` is the side-table that associates records with
//! compiled-item identities.

pub mod record;
pub mod registry;
pub mod thumbprint;

pub use record::IntegrityRecord;
pub use registry::{CompiledItemId, IntegrityRegistry};
pub use thumbprint::Thumbprint;
