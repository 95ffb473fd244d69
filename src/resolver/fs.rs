use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use super::{Resolution, SourceResolver};

/// Resolves identifiers as relative paths under a source root.
///
/// Each kind may be mapped to its own root; unmapped kinds use the default
/// root. Absolute identifiers, `..` components and absent identifiers never
/// resolve, so a manifest cannot make the verifier read outside its roots.
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    root: PathBuf,
    kind_roots: HashMap<String, PathBuf>,
}

impl FileSystemResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            kind_roots: HashMap::new(),
        }
    }

    /// Resolve identifiers of `kind` under `root` instead of the default root.
    pub fn with_kind_root(mut self, kind: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.kind_roots.insert(kind.into(), root.into());
        self
    }

    pub fn root_for(&self, kind: &str) -> &Path {
        self.kind_roots.get(kind).unwrap_or(&self.root)
    }

    fn locate(&self, kind: &str, identifier: &str) -> Option<PathBuf> {
        let relative = Path::new(identifier);
        let is_contained = !identifier.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_contained {
            tracing::warn!(kind, identifier, "identifier escapes source root, not resolving");
            return None;
        }
        Some(self.root_for(kind).join(relative))
    }
}

impl SourceResolver for FileSystemResolver {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution {
        let Some(identifier) = identifier else {
            return Resolution::NotFound;
        };
        let Some(path) = self.locate(kind, identifier) else {
            return Resolution::NotFound;
        };

        match std::fs::read(&path) {
            Ok(bytes) => Resolution::Found(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Resolution::NotFound,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read source, treating as missing"
                );
                Resolution::NotFound
            }
        }
    }
}
