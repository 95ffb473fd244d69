use crate::verify::policy::PolicyVerdict;
use crate::verify::{FindingKind, ItemReport, Verdict};

/// Render verification results for a terminal: failing items first, each
/// with the findings that failed.
pub fn render(items: &[ItemReport], verdict: &PolicyVerdict) -> String {
    let mut output = String::new();

    if items.is_empty() {
        output.push_str("\n  No compiled items in manifest.\n\n");
        return output;
    }

    let mut sorted: Vec<&ItemReport> = items.iter().collect();
    sorted.sort_by_key(|item| (verdict_rank(item.report.verdict), item.item.clone()));

    output.push_str(&format!("\n  {} item(s) checked:\n\n", items.len()));

    for item in &sorted {
        let tag = match item.report.verdict {
            Verdict::Invalid => "[INVALID]   ",
            Verdict::Incomplete => "[INCOMPLETE]",
            Verdict::Unknown => "[UNTRACKED] ",
            Verdict::Valid => "[OK]        ",
        };
        output.push_str(&format!("  {} {}\n", tag, item.item));

        for finding in item.report.failures() {
            let label = match finding.kind {
                FindingKind::Mismatch => "changed",
                FindingKind::MissingSource => "missing",
                FindingKind::UnsupportedAlgorithm => "unsupported",
                FindingKind::Verified => "ok",
            };
            output.push_str(&format!(
                "               {:<11} {}\n",
                label, finding.thumbprint
            ));
        }
    }

    let status = if verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "\n  Result: {} (valid: {}, invalid: {}, untracked: {}, incomplete: {})\n\n",
        status, verdict.valid, verdict.invalid, verdict.unknown, verdict.incomplete,
    ));

    output
}

fn verdict_rank(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Invalid => 0,
        Verdict::Incomplete => 1,
        Verdict::Unknown => 2,
        Verdict::Valid => 3,
    }
}
