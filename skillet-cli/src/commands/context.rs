//! Context gathering command
//!
//! Fetches issue context, reads the plan file, and validates referenced
//! files, then prints the bundle as markdown or JSON. The review command
//! shares the same gathering path before launching codex.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use skillet_core::{parse_reference, ContextBundle, Secrets};
use skillet_issues::IssueFetcher;

/// Gather and display review context
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Issue references (comma-separated): #123, PROJ-456, sentry:ID
    #[arg(short, long)]
    issues: Option<String>,

    /// Plan file path
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Additional files (comma-separated)
    #[arg(short, long)]
    files: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl ContextArgs {
    /// Execute the context command
    pub async fn execute(&self, _verbose: bool) -> anyhow::Result<()> {
        let bundle = gather_context(
            self.issues.as_deref(),
            self.plan.as_deref(),
            self.files.as_deref(),
        )
        .await;

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&bundle.render_json())?);
            }
            OutputFormat::Markdown => {
                print!("{}", bundle.render_markdown());
            }
        }

        Ok(())
    }
}

/// Parse references, fetch their contexts, and assemble the bundle
///
/// Unrecognized references and fetch failures are reported as warnings;
/// gathering never fails the command.
pub(crate) async fn gather_context(
    issues: Option<&str>,
    plan: Option<&Path>,
    files: Option<&str>,
) -> ContextBundle {
    let mut contexts = Vec::new();

    if let Some(issues) = issues {
        let secrets = match Secrets::load() {
            Ok(secrets) => secrets,
            Err(err) => {
                eprintln!("Warning: Could not load secrets: {}", err);
                Secrets::default()
            }
        };
        let fetcher = IssueFetcher::new(&secrets);

        for token in issues.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let reference = match parse_reference(token) {
                Some(reference) => reference,
                None => {
                    eprintln!("Warning: Could not parse issue reference: {}", token);
                    continue;
                }
            };

            eprintln!("Fetching {} issue {}...", reference.kind.name(), reference.id);
            match fetcher.fetch(&reference).await {
                Ok(context) => contexts.push(context),
                Err(err) => {
                    match &err {
                        skillet_issues::Error::MissingToken { .. } => {
                            eprintln!("Warning: {}", err);
                        }
                        _ => eprintln!(
                            "Warning: Could not fetch {} issue {}: {}",
                            reference.kind.name(),
                            reference.id,
                            err
                        ),
                    }
                    if let Some(hint) = err.access_hint() {
                        eprintln!("  ({})", hint);
                    }
                }
            }
        }
    }

    let file_tokens: Vec<String> = files
        .map(|list| list.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    ContextBundle::assemble(contexts, plan, &file_tokens)
}
