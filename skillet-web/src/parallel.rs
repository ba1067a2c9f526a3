//! Client for the Parallel web search and task APIs
//!
//! Two surfaces share one client: single-shot agentic search against
//! `/v1beta/search`, and deep research which creates a task run and polls it
//! until the report is ready.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};

const PARALLEL_API_BASE: &str = "https://api.parallel.ai";

/// Search processor tuned for agentic workflows
pub const DEFAULT_SEARCH_PROCESSOR: &str = "pro";

/// Default number of search results to request
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Default excerpt budget per result, kept concise for agent consumption
pub const DEFAULT_MAX_CHARS_PER_RESULT: u32 = 500;

/// How often to poll a task run while waiting for results
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Parameters for a single search call
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub objective: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_queries: Option<Vec<String>>,
    pub processor: String,
    pub max_results: u32,
    pub max_chars_per_result: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_policy: Option<SourcePolicy>,
}

/// Restricts which sources the search may draw from
#[derive(Debug, Clone, Serialize)]
pub struct SourcePolicy {
    pub allowed_domains: Vec<String>,
}

impl SearchRequest {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            search_queries: None,
            processor: DEFAULT_SEARCH_PROCESSOR.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            max_chars_per_result: DEFAULT_MAX_CHARS_PER_RESULT,
            source_policy: None,
        }
    }

    /// Guide the search with explicit queries alongside the objective
    pub fn with_queries(mut self, queries: Vec<String>) -> Self {
        if !queries.is_empty() {
            self.search_queries = Some(queries);
        }
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_chars(mut self, max_chars: u32) -> Self {
        self.max_chars_per_result = max_chars;
        self
    }

    /// Limit results to the given domains
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        if !domains.is_empty() {
            self.source_policy = Some(SourcePolicy {
                allowed_domains: domains,
            });
        }
        self
    }
}

/// One normalized search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub excerpt: String,
    pub publish_date: Option<String>,
}

/// Search outcome with the request context that produced it
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub objective: String,
    pub queries: Vec<String>,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    results: Vec<WireSearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    excerpts: Vec<String>,
}

fn result_from_wire(raw: WireSearchResult) -> SearchResult {
    // The API returns several excerpts per hit; keep the first few joined
    // into one snippet.
    let excerpt = raw
        .excerpts
        .into_iter()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ");
    SearchResult {
        title: raw.title.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        excerpt,
        publish_date: raw.publish_date,
    }
}

/// Task run creation and status payload
#[derive(Debug, Default, Deserialize)]
pub struct TaskRun {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
struct TaskResultBody {
    #[serde(default)]
    output: Option<TaskOutput>,
}

/// Output section of a completed task run
#[derive(Debug, Default, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub basis: Vec<BasisField>,
}

/// Evidence backing one output field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasisField {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
}

/// A cited source with supporting excerpts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub excerpts: Vec<String>,
}

/// Normalized deep research output
#[derive(Debug, Serialize)]
pub struct ResearchReport {
    pub query: String,
    pub processor: String,
    pub run_id: String,
    pub content: Option<Value>,
    pub basis: Vec<BasisField>,
}

impl ResearchReport {
    pub fn from_output(
        query: impl Into<String>,
        processor: impl Into<String>,
        run_id: impl Into<String>,
        output: TaskOutput,
    ) -> Self {
        Self {
            query: query.into(),
            processor: processor.into(),
            run_id: run_id.into(),
            content: normalize_content(output.content),
            basis: output.basis,
        }
    }
}

/// Reparse stringified JSON content so structured reports stay structured
pub fn normalize_content(content: Option<Value>) -> Option<Value> {
    match content {
        Some(Value::String(text)) => {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
        other => other,
    }
}

/// Parallel API client authenticated with an API key
#[derive(Debug, Clone)]
pub struct ParallelClient {
    api_key: String,
    client: reqwest::Client,
    api_base: String,
}

impl ParallelClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            api_base: PARALLEL_API_BASE.to_string(),
        }
    }

    /// Run one agentic web search
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!("{}/v1beta/search", self.api_base);
        debug!(objective = %request.objective, "running web search");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let body = read_success(response).await?;
        let parsed: SearchResponseBody = serde_json::from_str(&body)?;
        Ok(parsed.results.into_iter().map(result_from_wire).collect())
    }

    /// Start a deep research task run, returning its id
    pub async fn create_task_run(&self, input: &str, processor: &str) -> Result<String> {
        let url = format!("{}/v1/tasks/runs", self.api_base);
        let request = json!({
            "input": input,
            "processor": processor,
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let body = read_success(response).await?;
        let run: TaskRun = serde_json::from_str(&body)?;
        if run.run_id.is_empty() {
            return Err(Error::Api("Task run response missing run_id".to_string()));
        }
        debug!(run_id = %run.run_id, "created research task run");
        Ok(run.run_id)
    }

    /// Poll a task run until it completes, then fetch its output
    ///
    /// Returns `Error::Timeout` when the deadline passes before the run
    /// finishes.
    pub async fn wait_for_result(&self, run_id: &str, timeout: Duration) -> Result<TaskOutput> {
        let deadline = Instant::now() + timeout;
        loop {
            let run = self.task_run(run_id).await?;
            debug!(run_id, status = %run.status, "polled research task run");
            match run.status.as_str() {
                "completed" => return self.task_run_result(run_id).await,
                "failed" | "cancelled" => {
                    return Err(Error::Api(format!("Research run {} {}", run_id, run.status)));
                }
                _ => {}
            }
            if Instant::now() + POLL_INTERVAL > deadline {
                return Err(Error::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn task_run(&self, run_id: &str) -> Result<TaskRun> {
        let url = format!("{}/v1/tasks/runs/{}", self.api_base, run_id);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", self.api_key.as_str())
            .send()
            .await?;

        let body = read_success(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn task_run_result(&self, run_id: &str) -> Result<TaskOutput> {
        let url = format!("{}/v1/tasks/runs/{}/result", self.api_base, run_id);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", self.api_key.as_str())
            .send()
            .await?;

        let body = read_success(response).await?;
        let parsed: TaskResultBody = serde_json::from_str(&body)?;
        Ok(parsed.output.unwrap_or_default())
    }
}

async fn read_success(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        return Err(Error::Status { status, body });
    }
    Ok(response.text().await?)
}
