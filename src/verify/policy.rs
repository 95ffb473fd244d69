use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FindingKind, ItemReport, Verdict};

/// Policy verdict — the final pass/fail decision over all verified items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub pass: bool,
    pub items: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unknown: usize,
    pub incomplete: usize,
    /// Missing-source findings forgiven because their kind is optional.
    pub tolerated: usize,
}

/// Policy configuration loaded from `.thumbprint.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Whether items without thumbprints pass.
    #[serde(default = "default_allow_untracked")]
    pub allow_untracked: bool,
    /// Source kinds whose absence does not fail an item.
    #[serde(default)]
    pub optional_kinds: HashSet<String>,
}

fn default_allow_untracked() -> bool {
    true
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allow_untracked: true,
            optional_kinds: HashSet::new(),
        }
    }
}

impl Policy {
    /// Evaluate item reports against this policy and produce a verdict.
    pub fn evaluate(&self, reports: &[ItemReport]) -> PolicyVerdict {
        let mut verdict = PolicyVerdict {
            pass: true,
            items: reports.len(),
            valid: 0,
            invalid: 0,
            unknown: 0,
            incomplete: 0,
            tolerated: 0,
        };

        for item in reports {
            let report = &item.report;
            match report.verdict {
                Verdict::Valid => verdict.valid += 1,
                Verdict::Unknown => {
                    verdict.unknown += 1;
                    if !self.allow_untracked {
                        verdict.pass = false;
                    }
                }
                Verdict::Incomplete => {
                    verdict.incomplete += 1;
                    verdict.pass = false;
                }
                Verdict::Invalid => {
                    verdict.invalid += 1;
                    let mut blocking = false;
                    for finding in report.failures() {
                        if self.tolerates(finding.kind, finding.thumbprint.kind()) {
                            verdict.tolerated += 1;
                        } else {
                            blocking = true;
                        }
                    }
                    if blocking {
                        verdict.pass = false;
                    }
                }
            }
        }

        verdict
    }

    fn tolerates(&self, finding: FindingKind, source_kind: &str) -> bool {
        finding == FindingKind::MissingSource && self.optional_kinds.contains(source_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Thumbprint;
    use crate::verify::{Finding, VerificationReport};

    fn item(verdict: Verdict, findings: Vec<(FindingKind, &str)>) -> ItemReport {
        ItemReport {
            item: "page.tpl".into(),
            report: VerificationReport {
                verdict,
                findings: findings
                    .into_iter()
                    .map(|(kind, source_kind)| Finding {
                        kind,
                        thumbprint: Thumbprint::new("sha256", "00", source_kind, None).unwrap(),
                        computed: None,
                        message: "test".into(),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn default_policy_passes_valid_and_unknown() {
        let reports = vec![
            item(Verdict::Valid, vec![(FindingKind::Verified, "template")]),
            item(Verdict::Unknown, vec![]),
        ];
        let verdict = Policy::default().evaluate(&reports);
        assert!(verdict.pass);
        assert_eq!(verdict.valid, 1);
        assert_eq!(verdict.unknown, 1);
    }

    #[test]
    fn strict_policy_fails_unknown() {
        let policy = Policy {
            allow_untracked: false,
            ..Policy::default()
        };
        let verdict = policy.evaluate(&[item(Verdict::Unknown, vec![])]);
        assert!(!verdict.pass);
    }

    #[test]
    fn mismatch_fails() {
        let reports = [item(
            Verdict::Invalid,
            vec![(FindingKind::Mismatch, "template")],
        )];
        let verdict = Policy::default().evaluate(&reports);
        assert!(!verdict.pass);
        assert_eq!(verdict.invalid, 1);
    }

    #[test]
    fn optional_kind_tolerates_missing_source_only() {
        let mut policy = Policy::default();
        policy.optional_kinds.insert("import".into());

        let missing_import = item(
            Verdict::Invalid,
            vec![
                (FindingKind::Verified, "template"),
                (FindingKind::MissingSource, "import"),
            ],
        );
        let verdict = policy.evaluate(&[missing_import]);
        assert!(verdict.pass);
        assert_eq!(verdict.tolerated, 1);

        let changed_import = item(Verdict::Invalid, vec![(FindingKind::Mismatch, "import")]);
        assert!(!policy.evaluate(&[changed_import]).pass);
    }

    #[test]
    fn incomplete_always_fails() {
        let verdict = Policy::default().evaluate(&[item(Verdict::Incomplete, vec![])]);
        assert!(!verdict.pass);
        assert_eq!(verdict.incomplete, 1);
    }
}
