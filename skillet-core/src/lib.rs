//! Skillet Core - Core library for the skillet service-skill toolbox
//!
//! This crate provides the shared pieces of the skillet CLI: configuration
//! and secrets handling, the issue reference grammar, context bundle
//! assembly and rendering, and the codex review invocation.

pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod reference;
pub mod review;
pub mod secrets;

pub use config::Config;
pub use context::{ContextBundle, IssueContext, PlanDoc};
pub use error::{Error, Result};
pub use reference::{parse_reference, IssueReference, ReferenceKind};
pub use secrets::Secrets;
