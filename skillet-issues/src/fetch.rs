//! Backend abstraction and dispatch for issue fetching

use async_trait::async_trait;
use skillet_core::{IssueContext, IssueReference, ReferenceKind, Secrets};

use crate::github::GithubBackend;
use crate::linear::LinearBackend;
use crate::sentry::SentryBackend;
use crate::Result;

/// Trait for issue tracker backends
#[async_trait]
pub trait IssueBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &'static str;

    /// Fetch full context for one reference
    ///
    /// Errors are per-reference; callers report them and move on to the next
    /// reference rather than aborting the batch.
    async fn fetch(&self, reference: &IssueReference) -> Result<IssueContext>;
}

/// Dispatcher over the three supported trackers
///
/// The set of trackers is closed; dispatch is an exhaustive match on the
/// reference kind rather than a runtime registry.
pub struct IssueFetcher {
    github: GithubBackend,
    linear: LinearBackend,
    sentry: SentryBackend,
}

impl IssueFetcher {
    /// Build a fetcher with credentials resolved from secrets
    pub fn new(secrets: &Secrets) -> Self {
        Self {
            github: GithubBackend::new(),
            linear: LinearBackend::new(secrets.linear_api_key()),
            sentry: SentryBackend::new(secrets.sentry_auth_token()),
        }
    }

    /// Fetch context for a reference from its tracker
    pub async fn fetch(&self, reference: &IssueReference) -> Result<IssueContext> {
        match reference.kind {
            ReferenceKind::Github => self.github.fetch(reference).await,
            ReferenceKind::Linear => self.linear.fetch(reference).await,
            ReferenceKind::Sentry => self.sentry.fetch(reference).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_dispatch_reports_missing_credentials() {
        std::env::remove_var("LINEAR_API_KEY");
        std::env::remove_var("SENTRY_AUTH_TOKEN");

        let fetcher = IssueFetcher::new(&Secrets::default());

        let err = fetcher
            .fetch(&IssueReference::linear("ENG-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));

        let err = fetcher
            .fetch(&IssueReference::sentry("99"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(GithubBackend::new().name(), "github");
        assert_eq!(LinearBackend::new(None).name(), "linear");
        assert_eq!(SentryBackend::new(None).name(), "sentry");
    }
}
