//! Review invocation for the codex review flow
//!
//! This module decides what diff a review runs against and builds the codex
//! invocation. Diff source resolution prefers explicit flags, then falls back
//! to a working-tree probe, then to an interactive prompt.

mod invoke;
mod source;

pub use invoke::{tool_available, ReviewCommand};
pub use source::{resolve_diff_source, CompareChoice, DiffSource, Resolution};
