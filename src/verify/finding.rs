use serde::{Deserialize, Serialize};

use crate::model::{CompiledItemId, Thumbprint};

/// What verification concluded about a single thumbprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The recomputed digest matches the stored thumbprint.
    Verified,
    /// The source exists but its digest differs.
    Mismatch,
    /// The resolver could not produce the source.
    MissingSource,
    /// The thumbprint names an algorithm the verifier will not compute.
    UnsupportedAlgorithm,
}

impl FindingKind {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Verified)
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::MissingSource => write!(f, "missing source"),
            Self::UnsupportedAlgorithm => write!(f, "unsupported algorithm"),
        }
    }
}

/// Per-thumbprint verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub thumbprint: Thumbprint,
    /// Recomputed digest (canonical hex), present on mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<String>,
    pub message: String,
}

/// Aggregate outcome for one integrity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every thumbprint verified, and there was at least one.
    Valid,
    /// At least one thumbprint failed.
    Invalid,
    /// The record had no thumbprints; integrity was not tracked.
    Unknown,
    /// Verification was cancelled before every thumbprint was checked.
    Incomplete,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Unknown => write!(f, "unknown"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Verdict plus the findings that produced it, in attachment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
}

impl VerificationReport {
    /// Findings other than `Verified`.
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind.is_failure())
    }
}

/// Verification report for one registered compiled item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub item: CompiledItemId,
    #[serde(flatten)]
    pub report: VerificationReport,
}
