//! source-thumbprint — source-integrity thumbprints for compiled templates.
//!
//! Template tooling records a hash thumbprint of every source input that
//! contributed to a compiled item. This crate holds those thumbprints in
//! sealed integrity records, persists them in a manifest, and verifies them
//! later against the current sources to tell which compiled items are stale.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use thumbprint::{verify, VerifyOptions};
//!
//! let options = VerifyOptions::default();
//! let report = verify(Path::new("./templates"), &options).unwrap();
//! println!("Pass: {}, Items: {}", report.verdict.pass, report.items.len());
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod model;
pub mod output;
pub mod resolver;
pub mod stamp;
pub mod verify;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use config::Config;
use error::Result;
use manifest::Manifest;
use model::IntegrityRegistry;
use output::OutputFormat;
use verify::policy::PolicyVerdict;
use verify::ItemReport;

pub use model::{CompiledItemId, IntegrityRecord, Thumbprint};
pub use resolver::{Resolution, SourceResolver};
pub use verify::{IntegrityVerifier, Verdict};

/// Options for a verify invocation.
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Path to config file (defaults to `.thumbprint.toml` in the target dir).
    pub config_path: Option<PathBuf>,
    /// Manifest path override.
    pub manifest_path: Option<PathBuf>,
    /// CLI override: fail items that carry no thumbprints.
    pub strict: bool,
}

/// Complete verification report.
#[derive(Debug)]
pub struct VerifyReport {
    pub target_name: String,
    /// Manifest the thumbprints were read from.
    pub manifest_path: PathBuf,
    /// When the manifest was stamped, if recorded.
    pub generated_at: Option<DateTime<Utc>>,
    pub items: Vec<ItemReport>,
    pub verdict: PolicyVerdict,
}

/// Options for a stamp invocation.
#[derive(Debug, Clone, Default)]
pub struct StampRunOptions {
    pub config_path: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    /// CLI override for the stamping hash algorithm.
    pub algorithm: Option<String>,
}

/// Verify the manifest of a template tree against its current sources.
pub fn verify(path: &Path, options: &VerifyOptions) -> Result<VerifyReport> {
    let mut config = load_config(path, options.config_path.as_deref())?;
    if options.strict {
        config.policy.allow_untracked = false;
    }

    let manifest_path = options
        .manifest_path
        .clone()
        .unwrap_or_else(|| path.join(&config.manifest));
    let manifest = Manifest::load(&manifest_path)?;
    let generated_at = manifest.generated_at;
    let registry = manifest.into_registry()?;

    let verifier = config.verifier.verifier()?;
    let resolver = config.sources.resolver(path);
    let items = verifier.verify_registry(&registry, &resolver);
    let verdict = config.policy.evaluate(&items);

    tracing::info!(
        manifest = %manifest_path.display(),
        items = verdict.items,
        invalid = verdict.invalid,
        pass = verdict.pass,
        "verification complete"
    );

    Ok(VerifyReport {
        target_name: target_name(path),
        manifest_path,
        generated_at,
        items,
        verdict,
    })
}

/// Stamp every template under `path` and write the manifest.
///
/// Returns the registry that was written and the manifest path.
pub fn stamp(path: &Path, options: &StampRunOptions) -> Result<(IntegrityRegistry, PathBuf)> {
    let mut config = load_config(path, options.config_path.as_deref())?;
    if let Some(algorithm) = &options.algorithm {
        config.stamp.algorithm = algorithm.clone();
    }

    let roots = config.sources.resolver(path);
    let registry = stamp::stamp(&roots, &config.stamp)?;
    let manifest_path = options
        .manifest_path
        .clone()
        .unwrap_or_else(|| path.join(&config.manifest));
    Manifest::from_registry(&registry).save(&manifest_path)?;

    Ok((registry, manifest_path))
}

/// Render a verify report in the specified format.
pub fn render_report(report: &VerifyReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}

fn load_config(path: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.join(".thumbprint.toml"));
    Config::load(&config_path)
}

fn target_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".into())
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::verify::FindingKind;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_imports.tpl", "@using layout");
        write(dir.path(), "index.tpl", "<h1>home</h1>");
        write(dir.path(), "views/about.tpl", "<h1>about</h1>");
        dir
    }

    #[test]
    fn freshly_stamped_tree_verifies() {
        let dir = site();
        let (registry, manifest_path) = stamp(dir.path(), &StampRunOptions::default()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(manifest_path.exists());

        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(report.verdict.pass);
        assert_eq!(report.verdict.valid, 2);
        assert!(report
            .items
            .iter()
            .all(|item| item.report.verdict == Verdict::Valid));
    }

    #[test]
    fn edited_import_invalidates_every_dependent_item() {
        let dir = site();
        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        write(dir.path(), "_imports.tpl", "@using other-layout");

        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(!report.verdict.pass);
        assert_eq!(report.verdict.invalid, 2);
        for item in &report.items {
            let failing: Vec<(FindingKind, Option<&str>)> = item
                .report
                .failures()
                .map(|f| (f.kind, f.thumbprint.identifier()))
                .collect();
            assert_eq!(failing, vec![(FindingKind::Mismatch, Some("_imports.tpl"))]);
        }
    }

    #[test]
    fn deleted_template_reported_missing() {
        let dir = site();
        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        std::fs::remove_file(dir.path().join("views/about.tpl")).unwrap();

        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(!report.verdict.pass);
        let about = report
            .items
            .iter()
            .find(|item| item.item.as_str() == "views/about.tpl")
            .unwrap();
        assert_eq!(about.report.verdict, Verdict::Invalid);
        assert_eq!(about.report.findings[0].kind, FindingKind::MissingSource);
        assert_eq!(about.report.findings[1].kind, FindingKind::Verified);
    }

    #[test]
    fn optional_import_kind_tolerated_by_config() {
        let dir = site();
        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        std::fs::remove_file(dir.path().join("_imports.tpl")).unwrap();
        write(
            dir.path(),
            ".thumbprint.toml",
            "[policy]\noptional_kinds = [\"import\"]\n",
        );

        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(report.verdict.pass);
        assert_eq!(report.verdict.tolerated, 2);
    }

    #[test]
    fn strict_mode_fails_untracked_items() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "thumbprints.json",
            r#"{"version": 1, "items": {"legacy.tpl": []}}"#,
        );

        let lenient = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(lenient.verdict.pass);
        assert_eq!(lenient.items[0].report.verdict, Verdict::Unknown);

        let strict = VerifyOptions {
            strict: true,
            ..VerifyOptions::default()
        };
        assert!(!verify(dir.path(), &strict).unwrap().verdict.pass);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify(dir.path(), &VerifyOptions::default()).unwrap_err();
        assert!(matches!(err, crate::error::ThumbprintError::Io(_)));
    }

    #[test]
    fn json_report_renders() {
        let dir = site();
        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_report(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["verdict"]["pass"], true);
        assert_eq!(json["items"][0]["item"], "index.tpl");
        assert_eq!(json["items"][0]["verdict"], "valid");
        assert_eq!(json["target"], report.target_name.as_str());
        assert!(json["manifest"]["path"]
            .as_str()
            .unwrap()
            .ends_with("thumbprints.json"));
        assert!(json["manifest"]["generated_at"].is_string());
    }

    #[test]
    fn stamp_honours_configured_source_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/index.tpl", "<h1>home</h1>");
        write(dir.path(), "src/_imports.tpl", "@using layout");
        write(dir.path(), ".thumbprint.toml", "[sources]\nroot = \"src\"\n");

        let (registry, _) = stamp(dir.path(), &StampRunOptions::default()).unwrap();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["index.tpl"]);

        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(report.verdict.pass);
        assert_eq!(report.items[0].report.verdict, Verdict::Valid);
        assert_eq!(report.items[0].report.findings.len(), 2);
    }

    #[test]
    fn stamp_honours_per_kind_import_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "views/page.tpl", "<p>page</p>");
        write(dir.path(), "shared/_imports.tpl", "@using shared");
        write(
            dir.path(),
            ".thumbprint.toml",
            "[sources]\nroot = \"views\"\n\n[sources.kinds]\nimport = \"shared\"\n",
        );

        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(report.verdict.pass);

        write(dir.path(), "shared/_imports.tpl", "@using changed");
        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(!report.verdict.pass);
        let failing: Vec<(FindingKind, Option<&str>)> = report.items[0]
            .report
            .failures()
            .map(|f| (f.kind, f.thumbprint.identifier()))
            .collect();
        assert_eq!(failing, vec![(FindingKind::Mismatch, Some("_imports.tpl"))]);
    }

    #[test]
    fn edits_to_large_import_are_detected() {
        let dir = site();
        let mut big = vec![b'@'; 2 * 1024 * 1024];
        std::fs::write(dir.path().join("_imports.tpl"), &big).unwrap();
        stamp(dir.path(), &StampRunOptions::default()).unwrap();
        assert!(verify(dir.path(), &VerifyOptions::default()).unwrap().verdict.pass);

        big.push(b'!');
        std::fs::write(dir.path().join("_imports.tpl"), &big).unwrap();
        let report = verify(dir.path(), &VerifyOptions::default()).unwrap();
        assert!(!report.verdict.pass);
        assert_eq!(report.verdict.invalid, 2);
    }
}
