//! Sentry issue fetching via the REST API
//!
//! Two calls per issue: the issue itself for title and metadata, then a
//! best-effort fetch of the latest event to pull a stack trace out of its
//! exception entry. The second call failing never fails the fetch.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use skillet_core::{IssueContext, IssueReference};
use tracing::debug;

use crate::fetch::IssueBackend;
use crate::{Error, Result};

const SENTRY_API_BASE: &str = "https://sentry.io/api/0";

#[derive(Debug, Deserialize)]
struct SentryIssue {
    #[serde(default)]
    title: String,
    #[serde(default)]
    metadata: SentryMetadata,
    #[serde(default)]
    level: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Default, Deserialize)]
struct SentryMetadata {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct SentryEvent {
    #[serde(default)]
    entries: Vec<SentryEntry>,
}

#[derive(Debug, Deserialize)]
struct SentryEntry {
    #[serde(rename = "type", default)]
    entry_type: String,
    data: Option<serde_json::Value>,
}

/// Sentry backend speaking the REST API
#[derive(Debug, Clone)]
pub struct SentryBackend {
    auth_token: Option<String>,
    client: reqwest::Client,
    api_base: String,
}

impl SentryBackend {
    /// Create a Sentry backend; the token may be absent, in which case every
    /// fetch reports the missing credential
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token,
            client: reqwest::Client::new(),
            api_base: SENTRY_API_BASE.to_string(),
        }
    }

    /// Fetch the latest event's exception data, pretty-printed
    ///
    /// Any failure here (transport, status, parse) just means no stack trace.
    async fn latest_exception(&self, id: &str, auth_token: &str) -> Option<String> {
        let url = format!("{}/issues/{}/events/latest/", self.api_base, id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", auth_token))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let event: SentryEvent = response.json().await.ok()?;
        exception_data(&event)
    }
}

#[async_trait]
impl IssueBackend for SentryBackend {
    fn name(&self) -> &'static str {
        "sentry"
    }

    async fn fetch(&self, reference: &IssueReference) -> Result<IssueContext> {
        let auth_token = self.auth_token.as_ref().ok_or(Error::MissingToken {
            backend: "Sentry",
            var: "SENTRY_AUTH_TOKEN",
        })?;

        debug!(id = %reference.id, "Fetching Sentry issue");

        let url = format!("{}/issues/{}/", self.api_base, reference.id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Status { status, body });
        }

        let issue: SentryIssue = serde_json::from_str(&response.text().await?)?;
        let stack_trace = self.latest_exception(&reference.id, auth_token).await;

        Ok(context_from_issue(reference, issue, stack_trace))
    }
}

/// Pretty-print the data of the first exception entry, if any
fn exception_data(event: &SentryEvent) -> Option<String> {
    let entry = event.entries.iter().find(|e| e.entry_type == "exception")?;
    let data = entry.data.clone().unwrap_or_else(|| json!({}));
    serde_json::to_string_pretty(&data).ok()
}

fn context_from_issue(
    reference: &IssueReference,
    issue: SentryIssue,
    stack_trace: Option<String>,
) -> IssueContext {
    let mut description = issue.metadata.value;
    if let Some(trace) = stack_trace {
        description.push_str(&format!("\n\nStack trace:\n```\n{}\n```", trace));
    }

    IssueContext {
        reference: reference.clone(),
        title: issue.title,
        description,
        comments: Vec::new(),
        labels: vec![issue.level, issue.status],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_issue() {
        let payload = r#"{
            "title": "TypeError: cannot read null",
            "metadata": {"value": "cannot read null"},
            "level": "error",
            "status": "unresolved"
        }"#;
        let issue: SentryIssue = serde_json::from_str(payload).unwrap();
        let reference = IssueReference::sentry("5678");
        let ctx = context_from_issue(&reference, issue, None);

        assert_eq!(ctx.title, "TypeError: cannot read null");
        assert_eq!(ctx.description, "cannot read null");
        assert_eq!(ctx.labels, vec!["error", "unresolved"]);
        assert!(ctx.comments.is_empty());
    }

    #[test]
    fn test_stack_trace_appended() {
        let issue: SentryIssue =
            serde_json::from_str(r#"{"metadata": {"value": "boom"}}"#).unwrap();
        let ctx = context_from_issue(
            &IssueReference::sentry("1"),
            issue,
            Some("{\n  \"frames\": []\n}".to_string()),
        );

        assert!(ctx.description.starts_with("boom\n\nStack trace:\n```\n"));
        assert!(ctx.description.ends_with("\n```"));
        assert!(ctx.description.contains("\"frames\""));
    }

    #[test]
    fn test_sparse_issue_yields_empty_labels() {
        // Missing level and status become empty strings, filtered at render time
        let issue: SentryIssue = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        let ctx = context_from_issue(&IssueReference::sentry("2"), issue, None);
        assert_eq!(ctx.labels, vec!["", ""]);
        assert_eq!(ctx.description, "");
    }

    #[test]
    fn test_exception_entry_extracted() {
        let payload = r#"{
            "entries": [
                {"type": "breadcrumbs", "data": {"values": []}},
                {"type": "exception", "data": {"values": [{"type": "TypeError"}]}},
                {"type": "exception", "data": {"values": [{"type": "Ignored"}]}}
            ]
        }"#;
        let event: SentryEvent = serde_json::from_str(payload).unwrap();
        let data = exception_data(&event).unwrap();

        // First exception entry wins; output is pretty-printed
        assert!(data.contains("TypeError"));
        assert!(!data.contains("Ignored"));
        assert!(data.contains('\n'));
    }

    #[test]
    fn test_no_exception_entry() {
        let event: SentryEvent =
            serde_json::from_str(r#"{"entries": [{"type": "message"}]}"#).unwrap();
        assert!(exception_data(&event).is_none());

        let event: SentryEvent = serde_json::from_str(r#"{}"#).unwrap();
        assert!(exception_data(&event).is_none());
    }

    #[test]
    fn test_exception_entry_without_data() {
        let event: SentryEvent =
            serde_json::from_str(r#"{"entries": [{"type": "exception"}]}"#).unwrap();
        assert_eq!(exception_data(&event).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_missing_token_skips_fetch() {
        let backend = SentryBackend::new(None);
        let err = backend
            .fetch(&IssueReference::sentry("31415"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
        assert_eq!(
            err.to_string(),
            "SENTRY_AUTH_TOKEN not set, skipping Sentry issue"
        );
    }
}
