use crate::error::Result;
use crate::verify::{FindingKind, ItemReport};

use serde_json::{json, Value};

/// Render failing findings as SARIF 2.1.0.
///
/// One result per non-verified thumbprint, located at the source identifier.
pub fn render(items: &[ItemReport], target_name: &str) -> Result<String> {
    let rules: Vec<Value> = [
        FindingKind::Mismatch,
        FindingKind::MissingSource,
        FindingKind::UnsupportedAlgorithm,
    ]
    .iter()
    .map(|kind| {
        json!({
            "id": rule_id(*kind),
            "name": kind.to_string(),
            "shortDescription": { "text": rule_description(*kind) },
            "defaultConfiguration": { "level": level(*kind) },
        })
    })
    .collect();

    let results: Vec<Value> = items
        .iter()
        .flat_map(|item| item.report.failures().map(move |f| (item, f)))
        .map(|(item, f)| {
            let mut result = json!({
                "ruleId": rule_id(f.kind),
                "level": level(f.kind),
                "message": {
                    "text": format!("{}: {} ({})", item.item, f.message, f.thumbprint),
                },
                "properties": {
                    "compiledItem": item.item.as_str(),
                    "kind": f.thumbprint.kind(),
                    "hashAlgorithm": f.thumbprint.hash_algorithm(),
                    "expected": f.thumbprint.thumbprint(),
                },
            });

            if let Some(identifier) = f.thumbprint.identifier() {
                result["locations"] = json!([{
                    "physicalLocation": {
                        "artifactLocation": { "uri": identifier },
                    },
                }]);
            }
            if let Some(computed) = &f.computed {
                result["properties"]["actual"] = json!(computed);
            }

            result
        })
        .collect();

    let sarif = json!({
        "$schema": "https://docs.oasis-open.org/sarif/sarif/v2.1.0/errata01/os/schemas/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "thumbprint",
                    "version": env!("CARGO_PKG_VERSION"),
                    "semanticVersion": env!("CARGO_PKG_VERSION"),
                    "rules": rules,
                },
            },
            "results": results,
            "automationDetails": {
                "id": format!("thumbprint/{}", target_name),
            },
        }],
    });

    let output = serde_json::to_string_pretty(&sarif)?;
    Ok(output)
}

fn rule_id(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Mismatch => "THUMB-001",
        FindingKind::MissingSource => "THUMB-002",
        FindingKind::UnsupportedAlgorithm => "THUMB-003",
        FindingKind::Verified => "THUMB-000",
    }
}

fn rule_description(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Mismatch => "Source changed since the compiled item was built",
        FindingKind::MissingSource => "Source contribution no longer exists",
        FindingKind::UnsupportedAlgorithm => "Thumbprint uses an unsupported hash algorithm",
        FindingKind::Verified => "Thumbprint verified",
    }
}

fn level(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Mismatch | FindingKind::UnsupportedAlgorithm => "error",
        FindingKind::MissingSource => "warning",
        FindingKind::Verified => "note",
    }
}
