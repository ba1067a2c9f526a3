//! Linear issue fetching via the GraphQL API

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use skillet_core::{IssueContext, IssueReference};
use tracing::debug;

use crate::fetch::IssueBackend;
use crate::{Error, Result};

const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

const ISSUE_QUERY: &str = r#"
    query($id: String!) {
      issue(id: $id) {
        title
        description
        comments { nodes { body user { name } } }
        labels { nodes { name } }
      }
    }
"#;

/// GraphQL query response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GraphQLError {
    message: String,
    #[serde(default)]
    path: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IssueData {
    issue: Option<LinearIssue>,
}

#[derive(Debug, Deserialize)]
struct LinearIssue {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    comments: NodeList<LinearComment>,
    #[serde(default)]
    labels: NodeList<LinearLabel>,
}

#[derive(Debug, Deserialize)]
struct NodeList<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LinearComment {
    #[serde(default)]
    body: String,
    user: Option<LinearUser>,
}

#[derive(Debug, Deserialize)]
struct LinearUser {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct LinearLabel {
    #[serde(default)]
    name: String,
}

/// Linear backend speaking GraphQL
#[derive(Debug, Clone)]
pub struct LinearBackend {
    api_key: Option<String>,
    client: reqwest::Client,
    api_url: String,
}

impl LinearBackend {
    /// Create a Linear backend; the key may be absent, in which case every
    /// fetch reports the missing credential
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            api_url: LINEAR_API_URL.to_string(),
        }
    }
}

#[async_trait]
impl IssueBackend for LinearBackend {
    fn name(&self) -> &'static str {
        "linear"
    }

    async fn fetch(&self, reference: &IssueReference) -> Result<IssueContext> {
        let api_key = self.api_key.as_ref().ok_or(Error::MissingToken {
            backend: "Linear",
            var: "LINEAR_API_KEY",
        })?;

        debug!(id = %reference.id, "Fetching Linear issue via GraphQL");

        let request_body = json!({
            "query": ISSUE_QUERY,
            "variables": { "id": reference.id },
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", api_key)
            .json(&request_body)
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

        let body = response.text().await?;
        let issue = parse_issue_response(&body, &reference.id)?;

        Ok(context_from_issue(reference, issue))
    }
}

/// Unwrap the GraphQL envelope around an issue payload
fn parse_issue_response(body: &str, id: &str) -> Result<LinearIssue> {
    let graphql_response: GraphQLResponse<IssueData> = serde_json::from_str(body)?;

    if let Some(errors) = graphql_response.errors {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(Error::GraphQL(messages.join(", ")));
    }

    graphql_response
        .data
        .and_then(|d| d.issue)
        .ok_or_else(|| Error::NotFound(format!("Linear issue {} not found", id)))
}

fn context_from_issue(reference: &IssueReference, issue: LinearIssue) -> IssueContext {
    let comments = issue
        .comments
        .nodes
        .into_iter()
        .map(|c| {
            let author = c
                .user
                .map(|u| u.name)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("{}: {}", author, c.body)
        })
        .collect();

    IssueContext {
        reference: reference.clone(),
        title: issue.title,
        description: issue.description.unwrap_or_default(),
        comments,
        labels: issue.labels.nodes.into_iter().map(|l| l.name).collect(),
    }
}
