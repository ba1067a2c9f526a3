//! Deep research command
//!
//! Creates a Parallel task run for the query, polls until the report is
//! ready, and prints it as JSON or markdown with cited sources.

use std::time::Duration;

use clap::{Args, ValueEnum};
use serde_json::Value;
use skillet_core::{Config, Secrets};
use skillet_web::{ParallelClient, ResearchReport};

/// Deep research via the Parallel task API
#[derive(Args, Debug)]
pub struct ResearchArgs {
    /// Research query (max 15000 chars)
    query: String,

    /// Processor to use (defaults to the configured one)
    #[arg(short, long, value_enum)]
    processor: Option<Processor>,

    /// Max wait in seconds (defaults to the configured timeout)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Processor {
    ProFast,
    Pro,
    UltraFast,
    Ultra,
}

impl Processor {
    fn as_str(self) -> &'static str {
        match self {
            Processor::ProFast => "pro-fast",
            Processor::Pro => "pro",
            Processor::UltraFast => "ultra-fast",
            Processor::Ultra => "ultra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

impl ResearchArgs {
    /// Execute the research command
    pub async fn execute(&self, _verbose: bool, config: &Config) -> anyhow::Result<()> {
        if self.query.chars().count() > 15000 {
            anyhow::bail!("Query must be under 15000 characters");
        }

        let secrets = Secrets::load()?;
        let api_key = match secrets.parallel_api_key() {
            Some(key) => key,
            None => anyhow::bail!("PARALLEL_API_KEY required"),
        };

        let processor = self
            .processor
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| config.research.processor.clone());
        let timeout = self
            .timeout
            .map(Duration::from_secs)
            .unwrap_or(config.research.timeout);

        let client = ParallelClient::new(api_key);

        eprintln!("Starting research (processor={})...", processor);
        let run_id = client.create_task_run(&self.query, &processor).await?;
        eprintln!("Task ID: {}", run_id);
        eprintln!("Waiting for results...");

        let output = client.wait_for_result(&run_id, timeout).await?;
        let report = ResearchReport::from_output(self.query.clone(), processor, run_id, output);

        match self.format {
            OutputFormat::Markdown => println!("{}", format_markdown(&report)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        Ok(())
    }
}

fn format_markdown(report: &ResearchReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Research: {}", report.query));
    lines.push(String::new());
    lines.push(format!("**Processor:** {}", report.processor));
    lines.push(format!("**Run ID:** {}", report.run_id));
    lines.push(String::new());
    lines.push("## Findings".to_string());
    lines.push(String::new());

    match &report.content {
        Some(Value::String(text)) => lines.push(text.clone()),
        Some(value) => {
            lines.push("```json".to_string());
            lines.push(serde_json::to_string_pretty(value).unwrap_or_default());
            lines.push("```".to_string());
        }
        None => lines.push("_No content returned_".to_string()),
    }

    if !report.basis.is_empty() {
        lines.push(String::new());
        lines.push("## Sources".to_string());
        lines.push(String::new());

        for field in report.basis.iter().take(10) {
            let name = if field.field.is_empty() {
                "unknown"
            } else {
                field.field.as_str()
            };
            lines.push(format!("### {}", name));
            for citation in field.citations.iter().take(2) {
                lines.push(format!("- [{}]({})", citation.url, citation.url));
                if let Some(text) = citation.excerpts.first() {
                    if !text.is_empty() {
                        let quoted: String = text.chars().take(200).collect();
                        lines.push(format!("  > {}...", quoted));
                    }
                }
                lines.push(String::new());
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skillet_web::{BasisField, Citation};

    fn report_with(content: Option<Value>, basis: Vec<BasisField>) -> ResearchReport {
        ResearchReport {
            query: "rust async runtimes".to_string(),
            processor: "pro-fast".to_string(),
            run_id: "trun_42".to_string(),
            content,
            basis,
        }
    }

    #[test]
    fn test_markdown_with_prose_content() {
        let report = report_with(Some(Value::String("Tokio dominates.".to_string())), Vec::new());
        let markdown = format_markdown(&report);

        assert!(markdown.starts_with("# Research: rust async runtimes"));
        assert!(markdown.contains("**Processor:** pro-fast"));
        assert!(markdown.contains("**Run ID:** trun_42"));
        assert!(markdown.contains("## Findings"));
        assert!(markdown.contains("Tokio dominates."));
        assert!(!markdown.contains("## Sources"));
    }

    #[test]
    fn test_markdown_with_structured_content() {
        let report = report_with(Some(json!({"verdict": "tokio"})), Vec::new());
        let markdown = format_markdown(&report);

        assert!(markdown.contains("```json"));
        assert!(markdown.contains("\"verdict\": \"tokio\""));
    }

    #[test]
    fn test_markdown_without_content() {
        let report = report_with(None, Vec::new());
        assert!(format_markdown(&report).contains("_No content returned_"));
    }

    #[test]
    fn test_markdown_sources_are_limited() {
        let citation = |url: &str| Citation {
            title: None,
            url: url.to_string(),
            excerpts: vec!["q".repeat(250)],
        };
        let field = BasisField {
            field: "output".to_string(),
            citations: vec![
                citation("https://a.example"),
                citation("https://b.example"),
                citation("https://c.example"),
            ],
            reasoning: None,
            confidence: None,
        };
        let basis: Vec<BasisField> = (0..12).map(|_| field.clone()).collect();
        let report = report_with(None, basis);

        let markdown = format_markdown(&report);
        assert_eq!(markdown.matches("### output").count(), 10);
        // Two citations per field, excerpts quoted at 200 chars
        assert_eq!(markdown.matches("- [https://a.example]").count(), 10);
        assert!(!markdown.contains("https://c.example"));
        assert!(markdown.contains(&format!("  > {}...", "q".repeat(200))));
    }

    #[test]
    fn test_markdown_unnamed_field_shows_unknown() {
        let field = BasisField {
            field: String::new(),
            citations: vec![Citation {
                title: None,
                url: "https://a.example".to_string(),
                excerpts: Vec::new(),
            }],
            reasoning: None,
            confidence: None,
        };
        let report = report_with(None, vec![field]);
        assert!(format_markdown(&report).contains("### unknown"));
    }

    #[tokio::test]
    async fn test_overlong_query_is_rejected() {
        let args = ResearchArgs {
            query: "q".repeat(15001),
            processor: None,
            timeout: None,
            format: OutputFormat::Json,
        };

        let err = args.execute(false, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("under 15000 characters"));
    }
}
