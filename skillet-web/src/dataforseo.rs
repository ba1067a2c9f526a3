//! Client for the DataForSEO Labs keyword endpoints
//!
//! Covers the two Google keyword reports used for SEO research: suggestions
//! for a seed keyword and related keywords. Both are live (synchronous)
//! endpoints that take an array of task objects and answer with nested
//! task/result/item payloads, flattened here into [`KeywordMetrics`] rows.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};

const DATAFORSEO_API_BASE: &str = "https://api.dataforseo.com/v3";

/// United States
const DEFAULT_LOCATION_CODE: u32 = 2840;
const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Default number of keywords to request per seed
pub const DEFAULT_KEYWORD_LIMIT: u32 = 50;

const TASK_STATUS_OK: i64 = 20000;

/// Normalized metrics for one keyword
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    pub search_volume: i64,
    pub cpc: f64,
    pub competition: f64,
    pub competition_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LabsResponse {
    #[serde(default)]
    tasks: Vec<LabsTask>,
}

#[derive(Debug, Default, Deserialize)]
struct LabsTask {
    #[serde(default)]
    status_code: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    result: Option<Vec<LabsResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct LabsResult {
    #[serde(default)]
    items: Option<Vec<LabsItem>>,
}

/// Suggestion items carry the keyword fields directly; related-keyword items
/// nest them under `keyword_data`.
#[derive(Debug, Default, Deserialize)]
struct LabsItem {
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    keyword_info: Option<KeywordInfo>,
    #[serde(default)]
    keyword_data: Option<LabsKeywordData>,
}

#[derive(Debug, Default, Deserialize)]
struct LabsKeywordData {
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    keyword_info: Option<KeywordInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct KeywordInfo {
    #[serde(default)]
    search_volume: Option<i64>,
    #[serde(default)]
    cpc: Option<f64>,
    #[serde(default)]
    competition: Option<f64>,
    #[serde(default)]
    competition_level: Option<String>,
}

/// DataForSEO client authenticated with basic credentials
#[derive(Debug, Clone)]
pub struct DataForSeoClient {
    username: String,
    password: String,
    client: reqwest::Client,
    api_base: String,
}

impl DataForSeoClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client: reqwest::Client::new(),
            api_base: DATAFORSEO_API_BASE.to_string(),
        }
    }

    /// Keyword suggestions for a seed keyword, seed included
    pub async fn keyword_suggestions(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<KeywordMetrics>> {
        let task = json!({
            "keyword": keyword,
            "location_code": DEFAULT_LOCATION_CODE,
            "language_code": DEFAULT_LANGUAGE_CODE,
            "include_seed_keyword": true,
            "limit": limit,
        });
        self.labs_live("keyword_suggestions", task).await
    }

    /// Keywords related to a seed keyword
    pub async fn related_keywords(
        &self,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<KeywordMetrics>> {
        let task = json!({
            "keyword": keyword,
            "location_code": DEFAULT_LOCATION_CODE,
            "language_code": DEFAULT_LANGUAGE_CODE,
            "limit": limit,
        });
        self.labs_live("related_keywords", task).await
    }

    async fn labs_live(&self, endpoint: &str, task: Value) -> Result<Vec<KeywordMetrics>> {
        let url = format!("{}/dataforseo_labs/google/{}/live", self.api_base, endpoint);
        debug!(endpoint, "running keyword research request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!([task]))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Status { status, body });
        }

        let parsed: LabsResponse = serde_json::from_str(&response.text().await?)?;
        keywords_from_response(parsed)
    }
}

fn keywords_from_response(response: LabsResponse) -> Result<Vec<KeywordMetrics>> {
    let mut keywords = Vec::new();
    for task in response.tasks {
        if task.status_code != TASK_STATUS_OK {
            return Err(Error::Api(format!(
                "DataForSEO task failed: {} ({})",
                task.status_message, task.status_code
            )));
        }
        for result in task.result.unwrap_or_default() {
            for item in result.items.unwrap_or_default() {
                if let Some(metrics) = metrics_from_item(item) {
                    keywords.push(metrics);
                }
            }
        }
    }
    Ok(keywords)
}

fn metrics_from_item(item: LabsItem) -> Option<KeywordMetrics> {
    let (keyword, info) = match item.keyword_data {
        Some(data) => (data.keyword, data.keyword_info),
        None => (item.keyword, item.keyword_info),
    };
    let info = info?;
    Some(KeywordMetrics {
        keyword: keyword?,
        search_volume: info.search_volume.unwrap_or(0),
        cpc: info.cpc.unwrap_or(0.0),
        competition: info.competition.unwrap_or(0.0),
        competition_level: info.competition_level,
    })
}
