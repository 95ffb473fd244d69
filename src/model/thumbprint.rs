use serde::{Deserialize, Serialize};

use crate::error::{Result, ThumbprintError};

/// Well-known source kinds emitted by template tooling.
pub mod kinds {
    /// The template file a compiled item was generated from.
    pub const TEMPLATE: &str = "template";
    /// An import file whose directives were merged into the template.
    pub const IMPORT: &str = "import";
    /// An attribute or other out-of-file contribution.
    pub const ATTRIBUTE: &str = "attribute";
}

/// The hash thumbprint of one source input that contributed to a compiled item.
///
/// Immutable once constructed. `hash_algorithm`, `thumbprint` and `kind` are
/// never empty; `identifier` may be absent, which is distinct from an empty
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawThumbprint")]
pub struct Thumbprint {
    hash_algorithm: String,
    thumbprint: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
}

/// Unvalidated wire form, checked through `Thumbprint::new` on load.
#[derive(Deserialize)]
struct RawThumbprint {
    hash_algorithm: String,
    thumbprint: String,
    kind: String,
    #[serde(default)]
    identifier: Option<String>,
}

impl TryFrom<RawThumbprint> for Thumbprint {
    type Error = ThumbprintError;

    fn try_from(raw: RawThumbprint) -> Result<Self> {
        Thumbprint::new(raw.hash_algorithm, raw.thumbprint, raw.kind, raw.identifier)
    }
}

impl Thumbprint {
    /// Create a thumbprint, rejecting empty required fields.
    pub fn new(
        hash_algorithm: impl Into<String>,
        thumbprint: impl Into<String>,
        kind: impl Into<String>,
        identifier: Option<String>,
    ) -> Result<Self> {
        let hash_algorithm = hash_algorithm.into();
        let thumbprint = thumbprint.into();
        let kind = kind.into();

        if hash_algorithm.is_empty() {
            return Err(ThumbprintError::InvalidArgument {
                field: "hash_algorithm",
            });
        }
        if thumbprint.is_empty() {
            return Err(ThumbprintError::InvalidArgument { field: "thumbprint" });
        }
        if kind.is_empty() {
            return Err(ThumbprintError::InvalidArgument { field: "kind" });
        }

        Ok(Self {
            hash_algorithm,
            thumbprint,
            kind,
            identifier,
        })
    }

    /// Name of the hash algorithm used to create this thumbprint.
    pub fn hash_algorithm(&self) -> &str {
        &self.hash_algorithm
    }

    /// The digest in its canonical string encoding.
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    /// The kind of source that contributed this thumbprint.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Identifier of the contributing source, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl std::fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} ({})",
            self.kind,
            self.identifier.as_deref().unwrap_or("<none>"),
            self.hash_algorithm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accessors_return_inputs() {
        let t =
            Thumbprint::new("sha256", "abcd", kinds::TEMPLATE, Some("Page.tpl".into())).unwrap();
        assert_eq!(t.hash_algorithm(), "sha256");
        assert_eq!(t.thumbprint(), "abcd");
        assert_eq!(t.kind(), "template");
        assert_eq!(t.identifier(), Some("Page.tpl"));
    }

    #[test]
    fn empty_required_fields_rejected() {
        let err = Thumbprint::new("", "abcd", "template", None).unwrap_err();
        assert!(matches!(
            err,
            ThumbprintError::InvalidArgument {
                field: "hash_algorithm"
            }
        ));

        let err = Thumbprint::new("sha256", "", "template", None).unwrap_err();
        assert!(matches!(
            err,
            ThumbprintError::InvalidArgument { field: "thumbprint" }
        ));

        let err = Thumbprint::new("sha256", "abcd", "", None).unwrap_err();
        assert!(matches!(err, ThumbprintError::InvalidArgument { field: "kind" }));
    }

    #[test]
    fn absent_and_empty_identifier_are_distinct() {
        let absent = Thumbprint::new("sha256", "abcd", "template", None).unwrap();
        let empty = Thumbprint::new("sha256", "abcd", "template", Some(String::new())).unwrap();
        assert_eq!(absent.identifier(), None);
        assert_eq!(empty.identifier(), Some(""));
        assert_ne!(absent, empty);
        assert_eq!(
            absent,
            Thumbprint::new("sha256", "abcd", "template", None).unwrap()
        );
    }

    #[test]
    fn deserialize_enforces_invariants() {
        let ok: Thumbprint = serde_json::from_str(
            r#"{"hash_algorithm":"sha256","thumbprint":"ab","kind":"import"}"#,
        )
        .unwrap();
        assert_eq!(ok.identifier(), None);

        let bad = serde_json::from_str::<Thumbprint>(
            r#"{"hash_algorithm":"sha256","thumbprint":"","kind":"import"}"#,
        );
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn construction_preserves_fields(
            alg in "[a-z0-9-]{1,12}",
            digest in "[0-9a-f]{1,64}",
            kind in "[a-z]{1,10}",
            identifier in proptest::option::of(".{0,24}"),
        ) {
            let t = Thumbprint::new(alg.clone(), digest.clone(), kind.clone(), identifier.clone()).unwrap();
            prop_assert_eq!(t.hash_algorithm(), alg.as_str());
            prop_assert_eq!(t.thumbprint(), digest.as_str());
            prop_assert_eq!(t.kind(), kind.as_str());
            prop_assert_eq!(t.identifier(), identifier.as_deref());
        }
    }
}
