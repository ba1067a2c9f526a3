//! Keyword research commands
//!
//! Runs DataForSEO keyword reports per seed, continuing past per-seed
//! failures. Table output prints as each seed completes; JSON aggregates
//! the successful seeds at the end.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use skillet_core::Secrets;
use skillet_web::{DataForSeoClient, KeywordMetrics, DEFAULT_KEYWORD_LIMIT};

/// Keyword research commands
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    #[command(subcommand)]
    pub command: KeywordsCommand,
}

#[derive(Subcommand, Debug)]
pub enum KeywordsCommand {
    /// Keyword suggestions for seed keywords
    Suggestions {
        /// Seed keywords to research
        #[arg(required = true)]
        seeds: Vec<String>,

        /// Max results per seed
        #[arg(short = 'n', long, default_value_t = DEFAULT_KEYWORD_LIMIT)]
        limit: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Related keywords for seed keywords
    Related {
        /// Seed keywords to research
        #[arg(required = true)]
        seeds: Vec<String>,

        /// Max results per seed
        #[arg(short = 'n', long, default_value_t = DEFAULT_KEYWORD_LIMIT)]
        limit: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Serialize)]
struct SeedReport {
    seed: String,
    keywords: Vec<KeywordMetrics>,
}

impl KeywordsArgs {
    /// Execute the keywords command
    pub async fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        match &self.command {
            KeywordsCommand::Suggestions {
                seeds,
                limit,
                format,
            } => run_keywords(seeds, *limit, *format, false, verbose).await,
            KeywordsCommand::Related {
                seeds,
                limit,
                format,
            } => run_keywords(seeds, *limit, *format, true, verbose).await,
        }
    }
}

async fn run_keywords(
    seeds: &[String],
    limit: u32,
    format: OutputFormat,
    related: bool,
    _verbose: bool,
) -> anyhow::Result<()> {
    let secrets = Secrets::load()?;
    let (username, password) = match secrets.dataforseo_credentials() {
        Some(credentials) => credentials,
        None => anyhow::bail!("DATAFORSEO_USERNAME and DATAFORSEO_PASSWORD required"),
    };

    let client = DataForSeoClient::new(username, password);
    let mut reports = Vec::new();

    for seed in seeds {
        let fetched = if related {
            client.related_keywords(seed, limit).await
        } else {
            client.keyword_suggestions(seed, limit).await
        };

        match fetched {
            Ok(keywords) => {
                if format == OutputFormat::Table {
                    println!("\n=== {} ===\n", seed);
                    println!("{}", format_table(&keywords));
                }
                reports.push(SeedReport {
                    seed: seed.clone(),
                    keywords,
                });
            }
            Err(err) => eprintln!("Error for '{}': {}", seed, err),
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

fn format_table(keywords: &[KeywordMetrics]) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<40} {:>10} {:>8} {:>6} {:<10}",
        "Keyword", "Volume", "CPC", "Comp", "Level"
    ));
    lines.push("-".repeat(78));

    for kw in keywords {
        let keyword: String = kw.keyword.chars().take(40).collect();
        let level = kw.competition_level.as_deref().unwrap_or("n/a");
        lines.push(format!(
            "{:<40} {:>10} ${:>6.2} {:>6.2} {:<10}",
            keyword,
            group_thousands(kw.search_volume),
            kw.cpc,
            kw.competition,
            level
        ));
    }

    lines.join("\n")
}

/// Render an integer with comma thousands separators
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(keyword: &str, volume: i64) -> KeywordMetrics {
        KeywordMetrics {
            keyword: keyword.to_string(),
            search_volume: volume,
            cpc: 1.5,
            competition: 0.25,
            competition_level: Some("LOW".to_string()),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4400), "-4,400");
    }

    #[test]
    fn test_table_formats_rows() {
        let table = format_table(&[metrics("rust web framework", 4400)]);

        assert!(table.contains("Keyword"));
        assert!(table.contains(&"-".repeat(78)));
        assert!(table.contains("rust web framework"));
        assert!(table.contains("4,400"));
        assert!(table.contains("$  1.50"));
        assert!(table.contains("LOW"));
    }

    #[test]
    fn test_table_uses_na_for_missing_level() {
        let mut kw = metrics("orphan", 10);
        kw.competition_level = None;
        let table = format_table(&[kw]);
        assert!(table.contains("n/a"));
    }

    #[test]
    fn test_table_clips_long_keywords() {
        let long = "k".repeat(60);
        let table = format_table(&[metrics(&long, 1)]);
        assert!(table.contains(&"k".repeat(40)));
        assert!(!table.contains(&"k".repeat(41)));
    }
}
