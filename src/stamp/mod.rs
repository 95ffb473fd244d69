//! Build-time thumbprint producer.
//!
//! Walks the template root and records, for every template, the digest of the
//! template itself plus the digest of every import file that applies to it.
//! An import file applies to templates in its own directory and below. The
//! roots come from the same `FileSystemResolver` that verification uses, so
//! every recorded identifier resolves back to the file it was computed from.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::{Result, ThumbprintError};
use crate::model::thumbprint::kinds;
use crate::model::{CompiledItemId, IntegrityRecord, IntegrityRegistry, Thumbprint};
use crate::resolver::FileSystemResolver;

/// Stamping options, loaded from the `[stamp]` table of `.thumbprint.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampOptions {
    /// Hash algorithm name for new thumbprints.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// File extensions treated as templates.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// File names treated as imports rather than templates.
    #[serde(default = "default_import_names")]
    pub import_names: Vec<String>,
}

fn default_algorithm() -> String {
    HashAlgorithm::Sha256.name().to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["tpl".into(), "html".into()]
}

fn default_import_names() -> Vec<String> {
    vec!["_imports.tpl".into()]
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            extensions: default_extensions(),
            import_names: default_import_names(),
        }
    }
}

impl StampOptions {
    pub fn hash_algorithm(&self) -> Result<HashAlgorithm> {
        HashAlgorithm::from_name(&self.algorithm)
            .ok_or_else(|| ThumbprintError::UnknownAlgorithm(self.algorithm.clone()))
    }

    fn is_template(&self, path: &Path) -> bool {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.import_names.iter().any(|n| *n == file_name) {
            return false;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
    }
}

/// Produce an integrity registry for every template under the template root
/// of `roots`. Imports are looked up under the import root of `roots`.
pub fn stamp(roots: &FileSystemResolver, options: &StampOptions) -> Result<IntegrityRegistry> {
    let algorithm = options.hash_algorithm()?;
    let template_root = roots.root_for(kinds::TEMPLATE);
    let mut stamper = Stamper {
        import_root: roots.root_for(kinds::IMPORT),
        options,
        algorithm,
        import_cache: HashMap::new(),
    };

    let walker = ignore::WalkBuilder::new(template_root)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut templates: Vec<PathBuf> = walker
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && options.is_template(path))
        .collect();
    templates.sort();

    let mut registry = IntegrityRegistry::new();
    for path in templates {
        let Some(parts) = relative_parts(template_root, &path) else {
            continue;
        };
        let id = parts.join("/");

        let mut record = IntegrityRecord::new();
        record.attach(stamper.thumbprint(&path, kinds::TEMPLATE, &id)?)?;
        for import in stamper.imports_for(&parts[..parts.len() - 1])? {
            record.attach(import)?;
        }

        tracing::debug!(item = %id, thumbprints = record.len(), "stamped");
        registry.register(CompiledItemId::new(id), record)?;
    }

    tracing::info!(items = registry.len(), algorithm = %algorithm, "stamping complete");
    Ok(registry)
}

struct Stamper<'a> {
    import_root: &'a Path,
    options: &'a StampOptions,
    algorithm: HashAlgorithm,
    import_cache: HashMap<String, Option<Thumbprint>>,
}

impl Stamper<'_> {
    /// Thumbprint a file of any size, streaming it through the hasher.
    fn thumbprint(&self, path: &Path, kind: &str, id: &str) -> Result<Thumbprint> {
        let file = std::fs::File::open(path)?;
        let digest = self.algorithm.digest_reader(file)?;
        Thumbprint::new(
            self.algorithm.name(),
            hex::encode(digest),
            kind,
            Some(id.to_string()),
        )
    }

    /// Import thumbprints for a template whose directory is `dir_parts`
    /// (relative to the template root), outermost directory first.
    fn imports_for(&mut self, dir_parts: &[String]) -> Result<Vec<Thumbprint>> {
        let options = self.options;
        let mut imports = Vec::new();
        for depth in 0..=dir_parts.len() {
            let prefix = &dir_parts[..depth];
            for name in &options.import_names {
                let id = prefix
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(name.as_str()))
                    .collect::<Vec<_>>()
                    .join("/");
                if let Some(thumbprint) = self.import(&id)? {
                    imports.push(thumbprint);
                }
            }
        }
        Ok(imports)
    }

    fn import(&mut self, id: &str) -> Result<Option<Thumbprint>> {
        if let Some(cached) = self.import_cache.get(id) {
            return Ok(cached.clone());
        }
        let path = self.import_root.join(id);
        let thumbprint = if path.is_file() {
            Some(self.thumbprint(&path, kinds::IMPORT, id)?)
        } else {
            None
        };
        self.import_cache.insert(id.to_string(), thumbprint.clone());
        Ok(thumbprint)
    }
}

/// Components of `path` relative to `root`.
fn relative_parts(root: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}
