//! Codex review command
//!
//! Verifies codex is reachable, resolves the diff source, gathers issue and
//! file context, prints the preview, and replaces this process with
//! `codex review`.

use std::path::PathBuf;

use clap::Args;
use skillet_core::review::{
    resolve_diff_source, tool_available, DiffSource, Resolution, ReviewCommand,
};
use skillet_core::Config;

use super::context::gather_context;

/// Run a codex code review over a chosen diff
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Compare against a branch
    #[arg(short, long)]
    base: Option<String>,

    /// Review staged, unstaged, and untracked changes
    #[arg(short, long, conflicts_with_all = ["commit", "base"])]
    uncommitted: bool,

    /// Review a specific commit
    #[arg(short, long, conflicts_with = "base")]
    commit: Option<String>,

    /// Issue references (comma-separated): #123, PROJ-456, sentry:ID
    #[arg(short, long)]
    issues: Option<String>,

    /// Plan file path for context
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Additional files (comma-separated)
    #[arg(short, long)]
    files: Option<String>,

    /// Commit or PR title for the review summary
    #[arg(short, long)]
    title: Option<String>,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, _verbose: bool, config: &Config) -> anyhow::Result<()> {
        // Fail before any gathering if the tool is missing
        if !tool_available(&config.review.codex_path) {
            anyhow::bail!(
                "codex CLI not found at '{}'. Install from: https://github.com/openai/codex",
                config.review.codex_path
            );
        }

        let workdir = std::env::current_dir()?;
        let source = match resolve_diff_source(
            self.explicit_source(),
            &workdir,
            &config.review.base_branch,
        )? {
            Resolution::Review(source) => source,
            Resolution::Cancelled => return Ok(()),
        };

        let bundle = gather_context(
            self.issues.as_deref(),
            self.plan.as_deref(),
            self.files.as_deref(),
        )
        .await;

        let preview = bundle.render_preview();
        if !preview.is_empty() {
            eprint!("{}", preview);
            eprintln!("\n{}", "=".repeat(60));
            eprintln!("STARTING CODEX REVIEW");
            eprintln!("{}\n", "=".repeat(60));
        }

        let mut command =
            ReviewCommand::new(&config.review.codex_path, source, &config.review.model);
        if let Some(ref title) = self.title {
            command = command.with_title(title);
        }

        // Only returns on failure to launch
        command.exec()?;
        Ok(())
    }

    /// Diff source from explicit flags, if any were given
    ///
    /// The three flags conflict at parse time, so at most one is set here.
    fn explicit_source(&self) -> Option<DiffSource> {
        if self.uncommitted {
            Some(DiffSource::Uncommitted)
        } else if let Some(ref commit) = self.commit {
            Some(DiffSource::Commit(commit.clone()))
        } else {
            self.base.as_ref().map(|base| DiffSource::Base(base.clone()))
        }
    }
}
