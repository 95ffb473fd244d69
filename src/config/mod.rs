use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::{Result, ThumbprintError};
use crate::resolver::FileSystemResolver;
use crate::stamp::StampOptions;
use crate::verify::policy::Policy;
use crate::verify::IntegrityVerifier;

/// Top-level configuration from `.thumbprint.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Manifest path, relative to the target directory.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub verifier: VerifierConfig,
    #[serde(default)]
    pub stamp: StampOptions,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("thumbprints.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            policy: Policy::default(),
            sources: SourcesConfig::default(),
            verifier: VerifierConfig::default(),
            stamp: StampOptions::default(),
        }
    }
}

/// Where source contributions are read from during verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Default source root, relative to the target directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Per-kind source roots, relative to the target directory.
    #[serde(default)]
    pub kinds: HashMap<String, PathBuf>,
}

impl SourcesConfig {
    /// Build a file system resolver anchored at `base`.
    pub fn resolver(&self, base: &Path) -> FileSystemResolver {
        let root = match &self.root {
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };
        self.kinds
            .iter()
            .fold(FileSystemResolver::new(root), |resolver, (kind, dir)| {
                resolver.with_kind_root(kind.clone(), base.join(dir))
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Restrict accepted hash algorithms. All supported algorithms when unset.
    #[serde(default)]
    pub algorithms: Option<Vec<String>>,
}

impl VerifierConfig {
    pub fn verifier(&self) -> Result<IntegrityVerifier> {
        let Some(names) = &self.algorithms else {
            return Ok(IntegrityVerifier::new());
        };
        let algorithms = names
            .iter()
            .map(|name| {
                HashAlgorithm::from_name(name).ok_or_else(|| {
                    ThumbprintError::Config(format!("unknown hash algorithm '{}'", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(IntegrityVerifier::with_algorithms(algorithms))
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# source-thumbprint configuration

# Manifest holding the recorded thumbprints.
manifest = "thumbprints.json"

[policy]
# Pass items that carry no thumbprints at all.
allow_untracked = true

# Source kinds whose absence does not fail verification.
# optional_kinds = ["import"]

[sources]
# Directory identifiers are resolved against.
# root = "."

# Per-kind source directories.
# [sources.kinds]
# import = "shared"

[verifier]
# Accept only these hash algorithms (sha256, sha384, sha512, blake3).
# algorithms = ["sha256", "sha512"]

[stamp]
algorithm = "sha256"
extensions = ["tpl", "html"]
import_names = ["_imports.tpl"]
"#
    }
}
