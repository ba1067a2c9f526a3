//! GitHub issue fetching via the `gh` CLI
//!
//! Access goes through the locally installed `gh` binary so authentication
//! and repository inference stay with the GitHub CLI. An id can name either
//! an issue or a pull request; `issue view` is tried first and `pr view`
//! second, and the first success wins.

use async_trait::async_trait;
use serde::Deserialize;
use skillet_core::{IssueContext, IssueReference};
use tokio::process::Command;
use tracing::debug;

use crate::fetch::IssueBackend;
use crate::{Error, Result};

/// JSON shape returned by `gh issue view --json title,body,comments,labels`
#[derive(Debug, Deserialize)]
struct GhView {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    comments: Vec<GhComment>,
    #[serde(default)]
    labels: Vec<GhLabel>,
}

#[derive(Debug, Deserialize)]
struct GhComment {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct GhLabel {
    #[serde(default)]
    name: String,
}

/// GitHub backend shelling out to `gh`
#[derive(Debug, Clone, Default)]
pub struct GithubBackend;

impl GithubBackend {
    /// Create a new GitHub backend
    pub fn new() -> Self {
        Self
    }

    /// Run `gh <resource> view` and parse its JSON output
    async fn view(&self, resource: &str, reference: &IssueReference) -> Result<GhView> {
        let mut cmd = Command::new("gh");
        cmd.arg(resource)
            .arg("view")
            .arg(&reference.id)
            .arg("--json")
            .arg("title,body,comments,labels");

        if let Some(ref repo) = reference.repo {
            cmd.arg("--repo").arg(repo);
        }

        debug!(resource, id = %reference.id, repo = ?reference.repo, "Running gh view");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Tool("gh executable not found. Is the GitHub CLI installed?".to_string())
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::Tool(stderr));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait]
impl IssueBackend for GithubBackend {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn fetch(&self, reference: &IssueReference) -> Result<IssueContext> {
        match self.view("issue", reference).await {
            Ok(view) => Ok(context_from_view(reference, view)),
            Err(issue_err) => match self.view("pr", reference).await {
                Ok(view) => Ok(context_from_view(reference, view)),
                Err(_) => Err(issue_err),
            },
        }
    }
}

fn context_from_view(reference: &IssueReference, view: GhView) -> IssueContext {
    IssueContext {
        reference: reference.clone(),
        title: view.title,
        description: view.body.unwrap_or_default(),
        comments: view.comments.into_iter().map(|c| c.body).collect(),
        labels: view.labels.into_iter().map(|l| l.name).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gh_view() {
        let payload = r#"{
            "title": "Widget wobbles",
            "body": "Steps to reproduce...",
            "comments": [{"body": "repro confirmed"}, {"body": "fix inbound"}],
            "labels": [{"name": "bug"}, {"name": "p1"}]
        }"#;
        let view: GhView = serde_json::from_str(payload).unwrap();
        let reference = IssueReference::github("42", Some("acme/widgets".to_string()));
        let ctx = context_from_view(&reference, view);

        assert_eq!(ctx.title, "Widget wobbles");
        assert_eq!(ctx.description, "Steps to reproduce...");
        assert_eq!(ctx.comments, vec!["repro confirmed", "fix inbound"]);
        assert_eq!(ctx.labels, vec!["bug", "p1"]);
        assert_eq!(ctx.reference, reference);
    }

    #[test]
    fn test_parse_gh_view_null_body() {
        // gh emits null for empty PR bodies
        let payload = r#"{"title": "t", "body": null, "comments": [], "labels": []}"#;
        let view: GhView = serde_json::from_str(payload).unwrap();
        let reference = IssueReference::github("7", None);
        let ctx = context_from_view(&reference, view);

        assert_eq!(ctx.description, "");
        assert!(ctx.comments.is_empty());
        assert!(ctx.labels.is_empty());
    }

    #[test]
    fn test_parse_gh_view_missing_fields() {
        let payload = r#"{"title": "bare"}"#;
        let view: GhView = serde_json::from_str(payload).unwrap();
        assert_eq!(view.title, "bare");
        assert!(view.body.is_none());
        assert!(view.comments.is_empty());
    }
}
