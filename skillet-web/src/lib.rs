//! Skillet Web - Web research API clients for skillet
//!
//! This crate talks to the Parallel search and task APIs (agentic web search
//! and deep research) and the DataForSEO Labs keyword endpoints. Clients
//! return normalized rows; rendering stays in the CLI.

mod dataforseo;
mod error;
mod parallel;

pub use dataforseo::{DataForSeoClient, KeywordMetrics, DEFAULT_KEYWORD_LIMIT};
pub use error::{Error, Result};
pub use parallel::{
    normalize_content, BasisField, Citation, ParallelClient, ResearchReport, SearchReport,
    SearchRequest, SearchResult, TaskOutput, TaskRun, DEFAULT_MAX_CHARS_PER_RESULT,
    DEFAULT_MAX_RESULTS, DEFAULT_SEARCH_PROCESSOR,
};
