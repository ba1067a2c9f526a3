//! Codex invocation
//!
//! Builds the `codex review` argument vector and hands the terminal to codex
//! by replacing the current process. Argument construction is separate from
//! execution so it can be checked without spawning anything.

use std::process::Stdio;

use tracing::debug;

use super::source::DiffSource;
use crate::{Error, Result};

/// A fully specified codex review invocation
#[derive(Debug, Clone)]
pub struct ReviewCommand {
    codex_path: String,
    source: DiffSource,
    model: String,
    title: Option<String>,
}

impl ReviewCommand {
    /// Create a review command for the given diff source and model
    pub fn new(
        codex_path: impl Into<String>,
        source: DiffSource,
        model: impl Into<String>,
    ) -> Self {
        Self {
            codex_path: codex_path.into(),
            source,
            model: model.into(),
            title: None,
        }
    }

    /// Attach a summary title, passed through to codex verbatim
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the argument vector, excluding the program name
    ///
    /// The diff source maps to exactly one of `--uncommitted`, `--commit` or
    /// `--base`; the model always rides along as a config override.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["review".to_string()];

        match &self.source {
            DiffSource::Uncommitted => args.push("--uncommitted".to_string()),
            DiffSource::Commit(sha) => {
                args.push("--commit".to_string());
                args.push(sha.clone());
            }
            DiffSource::Base(branch) => {
                args.push("--base".to_string());
                args.push(branch.clone());
            }
        }

        args.push("-c".to_string());
        args.push(format!("model=\"{}\"", self.model));

        if let Some(ref title) = self.title {
            args.push("--title".to_string());
            args.push(title.clone());
        }

        args
    }

    /// Replace the current process with codex
    ///
    /// On Unix this exec()s and only returns on failure. Elsewhere it spawns
    /// codex, waits, and exits with the child's status. Either way control
    /// never comes back to the caller on success.
    pub fn exec(self) -> Result<()> {
        let args = self.to_args();
        debug!(codex_path = %self.codex_path, ?args, "Invoking codex review");

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            let err = std::process::Command::new(&self.codex_path)
                .args(&args)
                .exec();
            // exec() only returns on failure
            Err(spawn_error(err, &self.codex_path))
        }

        #[cfg(not(unix))]
        {
            let status = std::process::Command::new(&self.codex_path)
                .args(&args)
                .status()
                .map_err(|e| spawn_error(e, &self.codex_path))?;
            std::process::exit(status.code().unwrap_or(1));
        }
    }
}

/// Check that the review tool can be spawned at all
///
/// Runs `codex --version` with output discarded. This runs before any context
/// gathering so a missing tool fails before network or subprocess work.
pub fn tool_available(codex_path: &str) -> bool {
    std::process::Command::new(codex_path)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

fn spawn_error(err: std::io::Error, codex_path: &str) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::ReviewTool(format!(
            "Codex executable not found at '{}'. Is codex installed?",
            codex_path
        ))
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_uncommitted() {
        let cmd = ReviewCommand::new("codex", DiffSource::Uncommitted, "gpt-5.1-codex-max");
        assert_eq!(
            cmd.to_args(),
            vec!["review", "--uncommitted", "-c", "model=\"gpt-5.1-codex-max\""]
        );
    }

    #[test]
    fn test_args_base_branch() {
        let cmd = ReviewCommand::new("codex", DiffSource::Base("main".to_string()), "gpt-5");
        assert_eq!(
            cmd.to_args(),
            vec!["review", "--base", "main", "-c", "model=\"gpt-5\""]
        );
    }

    #[test]
    fn test_args_commit() {
        let cmd = ReviewCommand::new("codex", DiffSource::Commit("abc123".to_string()), "gpt-5");
        assert_eq!(
            cmd.to_args(),
            vec!["review", "--commit", "abc123", "-c", "model=\"gpt-5\""]
        );
    }

    #[test]
    fn test_args_with_title() {
        let cmd = ReviewCommand::new("codex", DiffSource::Uncommitted, "gpt-5")
            .with_title("Fix login race");
        assert_eq!(
            cmd.to_args(),
            vec![
                "review",
                "--uncommitted",
                "-c",
                "model=\"gpt-5\"",
                "--title",
                "Fix login race"
            ]
        );
    }

    #[test]
    fn test_title_passed_through_verbatim() {
        let cmd = ReviewCommand::new("codex", DiffSource::Uncommitted, "gpt-5")
            .with_title("weird \"title\" with $chars");
        let args = cmd.to_args();
        assert_eq!(args.last().unwrap(), "weird \"title\" with $chars");
    }

    #[test]
    fn test_missing_tool_not_available() {
        assert!(!tool_available("/nonexistent/skillet-codex"));
    }
}
