//! Context bundle assembly and rendering
//!
//! A bundle aggregates fetched issue contexts, an optional plan document, and
//! referenced file paths. It renders three ways: a bounded preview for the
//! diagnostic channel, an unbounded markdown document, and a JSON form for
//! machine consumption.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::reference::IssueReference;

/// Fully fetched context for one issue
#[derive(Debug, Clone)]
pub struct IssueContext {
    /// The reference this context was fetched for
    pub reference: IssueReference,

    /// Issue title
    pub title: String,

    /// Issue body or description
    pub description: String,

    /// Comment bodies, oldest first
    pub comments: Vec<String>,

    /// Label names; may contain empty strings for trackers with sparse fields
    pub labels: Vec<String>,
}

/// A plan document read from disk
#[derive(Debug, Clone)]
pub struct PlanDoc {
    /// Path the plan was read from
    pub path: PathBuf,

    /// Full plan text
    pub content: String,
}

/// Aggregated review context
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    /// Issue contexts in the order their references were given
    pub issues: Vec<IssueContext>,

    /// Plan document, if one was given and readable
    pub plan: Option<PlanDoc>,

    /// Referenced files that exist, in the order given
    pub file_paths: Vec<PathBuf>,
}

impl ContextBundle {
    /// Assemble a bundle from fetched issues and operator-supplied paths
    ///
    /// The plan is read only if its path exists; referenced files are kept
    /// only if they exist and are regular files. Anything missing produces a
    /// warning on stderr and is dropped rather than failing the run.
    pub fn assemble(
        issues: Vec<IssueContext>,
        plan_path: Option<&Path>,
        files: &[String],
    ) -> Self {
        let plan = plan_path.and_then(|path| {
            if !path.exists() {
                eprintln!("Warning: Plan file not found: {}", path.display());
                return None;
            }
            match std::fs::read_to_string(path) {
                Ok(content) => Some(PlanDoc {
                    path: path.to_path_buf(),
                    content,
                }),
                Err(e) => {
                    eprintln!("Warning: Could not read plan file {}: {}", path.display(), e);
                    None
                }
            }
        });

        let mut file_paths = Vec::new();
        for token in files {
            let path = Path::new(token.trim());
            if path.exists() && path.is_file() {
                file_paths.push(path.to_path_buf());
            } else {
                eprintln!("Warning: File not found: {}", path.display());
            }
        }

        Self {
            issues,
            plan,
            file_paths,
        }
    }

    /// Whether the bundle carries no context at all
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.plan.is_none() && self.file_paths.is_empty()
    }

    /// Render a bounded digest for the diagnostic channel
    ///
    /// Descriptions are cut at 500 characters, at most two comments are shown
    /// at 200 characters each, the plan is limited to its first ten lines, and
    /// files are listed by path without content. An empty bundle renders as an
    /// empty string.
    pub fn render_preview(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        push_line(&mut out, format!("\n{}", "=".repeat(60)));
        push_line(&mut out, "GATHERED CONTEXT");
        push_line(&mut out, "=".repeat(60));

        if !self.issues.is_empty() {
            push_line(&mut out, "\n## Related Issues");
            for ctx in &self.issues {
                push_line(
                    &mut out,
                    format!("\n### {}: {}", ctx.reference.kind.label(), ctx.reference.id),
                );
                push_line(&mut out, format!("**Title:** {}", ctx.title));
                let labels = join_labels(&ctx.labels);
                if !labels.is_empty() {
                    push_line(&mut out, format!("**Labels:** {}", labels));
                }
                if !ctx.description.is_empty() {
                    push_line(&mut out, format!("\n{}", truncate(&ctx.description, 500)));
                }
                if !ctx.comments.is_empty() {
                    push_line(
                        &mut out,
                        format!("\n**Comments:** ({} total)", ctx.comments.len()),
                    );
                    for comment in ctx.comments.iter().take(2) {
                        push_line(&mut out, format!("  - {}", truncate(comment, 200)));
                    }
                }
            }
        }

        if let Some(ref plan) = self.plan {
            push_line(&mut out, format!("\n## Plan File: {}", plan.path.display()));
            let lines: Vec<&str> = plan.content.split('\n').collect();
            push_line(
                &mut out,
                lines.iter().take(10).copied().collect::<Vec<_>>().join("\n"),
            );
            if lines.len() > 10 {
                push_line(&mut out, "...");
            }
        }

        if !self.file_paths.is_empty() {
            push_line(
                &mut out,
                format!("\n## Referenced Files ({})", self.file_paths.len()),
            );
            for path in &self.file_paths {
                push_line(&mut out, format!("  - {}", path.display()));
            }
        }

        out
    }

    /// Render the full human-readable markdown document
    ///
    /// Descriptions, the plan, and referenced file contents appear whole; up
    /// to five comments are shown per issue and files render in fenced blocks.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();

        if !self.issues.is_empty() {
            push_line(&mut out, "# Related Issues\n");
            for ctx in &self.issues {
                push_line(
                    &mut out,
                    format!("## {}: {}", ctx.reference.kind.label(), ctx.reference.id),
                );
                push_line(&mut out, format!("**Title:** {}", ctx.title));
                let labels = join_labels(&ctx.labels);
                if !labels.is_empty() {
                    push_line(&mut out, format!("**Labels:** {}", labels));
                }
                push_line(&mut out, format!("\n{}\n", ctx.description));
                if !ctx.comments.is_empty() {
                    push_line(&mut out, "**Comments:**");
                    for comment in ctx.comments.iter().take(5) {
                        push_line(&mut out, format!("- {}...", cap(comment, 300)));
                    }
                }
                push_line(&mut out, "");
            }
        }

        if let Some(ref plan) = self.plan {
            push_line(&mut out, format!("# Plan: {}\n", plan.path.display()));
            push_line(&mut out, plan.content.as_str());
            push_line(&mut out, "");
        }

        let contents = self.read_file_contents();
        if !contents.is_empty() {
            push_line(&mut out, "# Referenced Files\n");
            for (path, content) in &contents {
                push_line(&mut out, format!("## {}", path.display()));
                push_line(&mut out, format!("```\n{}\n```", content));
                push_line(&mut out, "");
            }
        }

        out
    }

    /// Render the machine-readable JSON form
    ///
    /// Issue fields are carried untruncated; referenced file contents are
    /// capped at 2000 characters each.
    pub fn render_json(&self) -> serde_json::Value {
        let issues: Vec<serde_json::Value> = self
            .issues
            .iter()
            .map(|ctx| {
                json!({
                    "type": ctx.reference.kind,
                    "id": ctx.reference.id,
                    "repo": ctx.reference.repo,
                    "title": ctx.title,
                    "description": ctx.description,
                    "labels": ctx.labels,
                    "comments": ctx.comments,
                })
            })
            .collect();

        // PathBuf's Serialize rejects non-UTF-8 names; render lossily instead
        let plan = self
            .plan
            .as_ref()
            .map(|p| json!({ "path": p.path.display().to_string(), "content": p.content }));

        let files: Vec<serde_json::Value> = self
            .read_file_contents()
            .iter()
            .map(|(path, content)| {
                json!({ "path": path.display().to_string(), "content": cap(content, 2000) })
            })
            .collect();

        json!({
            "issues": issues,
            "plan": plan,
            "files": files,
        })
    }

    /// Read referenced file contents, skipping anything unreadable
    fn read_file_contents(&self) -> Vec<(PathBuf, String)> {
        self.file_paths
            .iter()
            .filter_map(|path| {
                std::fs::read_to_string(path)
                    .ok()
                    .map(|content| (path.clone(), content))
            })
            .collect()
    }
}

fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

/// Join labels for display, dropping empty entries
fn join_labels(labels: &[String]) -> String {
    labels
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cut a string to at most `max` characters, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Cut a string to at most `max` characters with no marker
fn cap(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
