//! Source resolvers supply the current bytes of a source contribution.
//!
//! The verifier asks a resolver for `(kind, identifier)` and recomputes the
//! digest from whatever comes back. Resolvers may block on I/O.

pub mod cancel;
pub mod fs;
pub mod memory;

pub use cancel::{Cancellable, CancellationToken};
pub use fs::FileSystemResolver;
pub use memory::InMemoryResolver;

/// Outcome of resolving one source contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Current raw bytes of the source.
    Found(Vec<u8>),
    /// The source no longer exists or cannot be located.
    NotFound,
    /// The caller cancelled the operation; verification stops.
    Cancelled,
}

/// Retrieves current source bytes for a thumbprint's `(kind, identifier)`.
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution;
}

impl<R: SourceResolver + ?Sized> SourceResolver for &R {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution {
        (**self).resolve(kind, identifier)
    }
}

impl<R: SourceResolver + ?Sized> SourceResolver for Box<R> {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution {
        (**self).resolve(kind, identifier)
    }
}
