//! Agentic web search command

use clap::{Args, ValueEnum};
use skillet_core::Secrets;
use skillet_web::{
    ParallelClient, SearchReport, SearchRequest, DEFAULT_MAX_CHARS_PER_RESULT, DEFAULT_MAX_RESULTS,
};

/// Agentic web search via the Parallel API
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Natural language search goal
    #[arg(short, long)]
    objective: String,

    /// Additional keyword queries
    #[arg(short, long)]
    query: Vec<String>,

    /// Max results (1-20)
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
    limit: u32,

    /// Max chars per excerpt
    #[arg(short = 'c', long, default_value_t = DEFAULT_MAX_CHARS_PER_RESULT)]
    max_chars: u32,

    /// Allowed domains
    #[arg(short, long)]
    domain: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

impl SearchArgs {
    /// Execute the search command
    pub async fn execute(&self, _verbose: bool) -> anyhow::Result<()> {
        if !(1..=20).contains(&self.limit) {
            anyhow::bail!("--limit must be between 1 and 20");
        }

        let secrets = Secrets::load()?;
        let api_key = match secrets.parallel_api_key() {
            Some(key) => key,
            None => anyhow::bail!("PARALLEL_API_KEY required"),
        };

        let request = SearchRequest::new(self.objective.clone())
            .with_queries(self.query.clone())
            .with_max_results(self.limit)
            .with_max_chars(self.max_chars)
            .with_allowed_domains(self.domain.clone());

        let client = ParallelClient::new(api_key);
        let results = client.search(&request).await?;

        let report = SearchReport {
            objective: self.objective.clone(),
            queries: self.query.clone(),
            results,
        };

        match self.format {
            OutputFormat::Table => println!("{}", format_table(&report)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        Ok(())
    }
}

fn format_table(report: &SearchReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Objective: {}", report.objective));
    if !report.queries.is_empty() {
        lines.push(format!("Queries: {}", report.queries.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("{:<3} {:<50} {:<40}", "#", "Title", "URL"));
    lines.push("-".repeat(95));

    for (index, result) in report.results.iter().enumerate() {
        let title = clip(&result.title, 50, 48);
        let url = clip(&result.url, 40, 38);
        lines.push(format!("{:<3} {:<50} {:<40}", index + 1, title, url));
        if !result.excerpt.is_empty() {
            lines.push(format!("    {}", snippet(&result.excerpt, 200)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Shorten to `keep` characters with a two-dot marker when over `max`
fn clip(text: &str, max: usize, keep: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(keep).collect();
        format!("{}..", cut)
    } else {
        text.to_string()
    }
}

fn snippet(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillet_web::SearchResult;

    fn sample_report() -> SearchReport {
        SearchReport {
            objective: "rust web frameworks".to_string(),
            queries: vec!["axum".to_string(), "actix".to_string()],
            results: vec![SearchResult {
                title: "Axum docs".to_string(),
                url: "https://docs.rs/axum".to_string(),
                excerpt: "Ergonomic web framework".to_string(),
                publish_date: None,
            }],
        }
    }

    #[test]
    fn test_table_header_and_numbering() {
        let table = format_table(&sample_report());
        assert!(table.starts_with("Objective: rust web frameworks"));
        assert!(table.contains("Queries: axum, actix"));
        assert!(table.contains(&"-".repeat(95)));
        assert!(table.contains("1   Axum docs"));
        assert!(table.contains("    Ergonomic web framework"));
    }

    #[test]
    fn test_table_skips_queries_line_when_empty() {
        let mut report = sample_report();
        report.queries.clear();
        let table = format_table(&report);
        assert!(!table.contains("Queries:"));
    }

    #[test]
    fn test_long_fields_are_clipped() {
        let mut report = sample_report();
        report.results[0].title = "t".repeat(60);
        report.results[0].url = format!("https://example.com/{}", "u".repeat(40));
        report.results[0].excerpt = "e".repeat(250);

        let table = format_table(&report);
        let clipped_title = format!("{}..", "t".repeat(48));
        assert!(table.contains(&clipped_title));
        assert!(!table.contains(&"t".repeat(49)));
        assert!(table.contains(&format!("{}...", "e".repeat(200))));
    }

    #[test]
    fn test_short_fields_pass_through() {
        assert_eq!(clip("short", 50, 48), "short");
        assert_eq!(snippet("short", 200), "short");
        // Exactly at the limit is kept whole
        assert_eq!(clip(&"x".repeat(50), 50, 48), "x".repeat(50));
    }

    #[tokio::test]
    async fn test_limit_out_of_range_is_rejected() {
        for limit in [0, 21] {
            let args = SearchArgs {
                objective: "rust web frameworks".to_string(),
                query: Vec::new(),
                limit,
                max_chars: DEFAULT_MAX_CHARS_PER_RESULT,
                domain: Vec::new(),
                format: OutputFormat::Json,
            };

            let err = args.execute(false).await.unwrap_err();
            assert!(err.to_string().contains("--limit must be between 1 and 20"));
        }
    }
}
