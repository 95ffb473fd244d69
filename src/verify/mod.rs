//! Integrity verification.
//!
//! `IntegrityVerifier` re-derives digests for every thumbprint of a record
//! from the bytes a `SourceResolver` returns now, and compares them against
//! what was stored at build time. Failures are collected as findings; only
//! cancellation stops the walk early.

pub mod finding;
pub mod policy;

use std::collections::HashSet;

use crate::digest::{self, HashAlgorithm};
use crate::model::{IntegrityRecord, IntegrityRegistry, Thumbprint};
use crate::resolver::{Resolution, SourceResolver};

pub use finding::{Finding, FindingKind, ItemReport, Verdict, VerificationReport};

/// Verifies integrity records against current source bytes.
///
/// Holds no mutable state; one verifier can serve any number of concurrent
/// `verify` calls.
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    algorithms: HashSet<HashAlgorithm>,
}

impl IntegrityVerifier {
    /// A verifier accepting every supported algorithm.
    pub fn new() -> Self {
        Self {
            algorithms: HashAlgorithm::ALL.into_iter().collect(),
        }
    }

    /// A verifier that only accepts the given algorithms. Thumbprints using
    /// any other algorithm are reported as unsupported.
    pub fn with_algorithms<I>(algorithms: I) -> Self
    where
        I: IntoIterator<Item = HashAlgorithm>,
    {
        Self {
            algorithms: algorithms.into_iter().collect(),
        }
    }

    pub fn accepts(&self, algorithm: HashAlgorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    /// Verify every thumbprint of `record` in attachment order.
    pub fn verify<R>(&self, record: &IntegrityRecord, resolver: &R) -> VerificationReport
    where
        R: SourceResolver + ?Sized,
    {
        if record.is_empty() {
            return VerificationReport {
                verdict: Verdict::Unknown,
                findings: Vec::new(),
            };
        }

        let mut findings = Vec::with_capacity(record.len());
        for thumbprint in record.all() {
            let bytes = match resolver.resolve(thumbprint.kind(), thumbprint.identifier()) {
                Resolution::Found(bytes) => bytes,
                Resolution::NotFound => {
                    tracing::warn!(source = %thumbprint, "source not found");
                    findings.push(finding(
                        FindingKind::MissingSource,
                        thumbprint,
                        None,
                        "source could not be resolved".into(),
                    ));
                    continue;
                }
                Resolution::Cancelled => {
                    tracing::info!(
                        checked = findings.len(),
                        total = record.len(),
                        "verification cancelled"
                    );
                    return VerificationReport {
                        verdict: Verdict::Incomplete,
                        findings,
                    };
                }
            };

            findings.push(self.check(thumbprint, &bytes));
        }

        let verdict = if findings.iter().any(|f| f.kind.is_failure()) {
            Verdict::Invalid
        } else {
            Verdict::Valid
        };

        VerificationReport { verdict, findings }
    }

    /// Verify every item of a registry, ordered by item id.
    pub fn verify_registry<R>(&self, registry: &IntegrityRegistry, resolver: &R) -> Vec<ItemReport>
    where
        R: SourceResolver + ?Sized,
    {
        registry
            .iter()
            .map(|(id, record)| {
                let report = self.verify(record, resolver);
                tracing::debug!(item = %id, verdict = %report.verdict, "item verified");
                ItemReport {
                    item: id.clone(),
                    report,
                }
            })
            .collect()
    }

    fn check(&self, thumbprint: &Thumbprint, bytes: &[u8]) -> Finding {
        let algorithm = match HashAlgorithm::from_name(thumbprint.hash_algorithm()) {
            Some(alg) if self.accepts(alg) => alg,
            _ => {
                tracing::warn!(
                    source = %thumbprint,
                    algorithm = thumbprint.hash_algorithm(),
                    "unsupported hash algorithm"
                );
                return finding(
                    FindingKind::UnsupportedAlgorithm,
                    thumbprint,
                    None,
                    format!("hash algorithm '{}' is not supported", thumbprint.hash_algorithm()),
                );
            }
        };

        let actual = algorithm.digest(bytes);
        if digest::digests_match(thumbprint.thumbprint(), &actual) {
            tracing::debug!(source = %thumbprint, "thumbprint verified");
            finding(
                FindingKind::Verified,
                thumbprint,
                None,
                "digest matches".into(),
            )
        } else {
            tracing::warn!(source = %thumbprint, "thumbprint mismatch");
            finding(
                FindingKind::Mismatch,
                thumbprint,
                Some(hex::encode(&actual)),
                "source changed since the thumbprint was recorded".into(),
            )
        }
    }
}

impl Default for IntegrityVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn finding(
    kind: FindingKind,
    thumbprint: &Thumbprint,
    computed: Option<String>,
    message: String,
) -> Finding {
    Finding {
        kind,
        thumbprint: thumbprint.clone(),
        computed,
        message,
    }
}
