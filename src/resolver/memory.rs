use std::collections::HashMap;

use super::{Resolution, SourceResolver};

/// Resolver backed by an in-memory map of `(kind, identifier)` to bytes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    sources: HashMap<(String, Option<String>), Vec<u8>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a source, builder style.
    pub fn with_source(
        mut self,
        kind: impl Into<String>,
        identifier: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(kind, identifier, bytes);
        self
    }

    pub fn insert(
        &mut self,
        kind: impl Into<String>,
        identifier: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) {
        self.sources
            .insert((kind.into(), identifier.map(String::from)), bytes.into());
    }
}

impl SourceResolver for InMemoryResolver {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution {
        self.sources
            .get(&(kind.to_string(), identifier.map(String::from)))
            .map(|bytes| Resolution::Found(bytes.clone()))
            .unwrap_or(Resolution::NotFound)
    }
}
