use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Resolution, SourceResolver};

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Wraps a resolver so that every lookup after cancellation reports
/// `Resolution::Cancelled` instead of reaching the inner resolver.
#[derive(Debug, Clone)]
pub struct Cancellable<R> {
    inner: R,
    token: CancellationToken,
}

impl<R: SourceResolver> Cancellable<R> {
    pub fn new(inner: R, token: CancellationToken) -> Self {
        Self { inner, token }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<R: SourceResolver> SourceResolver for Cancellable<R> {
    fn resolve(&self, kind: &str, identifier: Option<&str>) -> Resolution {
        if self.token.is_cancelled() {
            return Resolution::Cancelled;
        }
        self.inner.resolve(kind, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::InMemoryResolver;

    #[test]
    fn cancelled_token_short_circuits_lookups() {
        let token = CancellationToken::new();
        let resolver = Cancellable::new(
            InMemoryResolver::new().with_source("template", Some("a.tpl"), b"x".to_vec()),
            token.clone(),
        );

        assert_eq!(
            resolver.resolve("template", Some("a.tpl")),
            Resolution::Found(b"x".to_vec())
        );
        token.cancel();
        assert!(resolver.token().is_cancelled());
        assert_eq!(
            resolver.resolve("template", Some("a.tpl")),
            Resolution::Cancelled
        );
    }
}
