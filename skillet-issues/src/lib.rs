//! Skillet Issues - Issue tracker integrations for skillet
//!
//! This crate fetches issue context from GitHub (via the `gh` CLI), Linear
//! (GraphQL) and Sentry (REST). The tracker set is closed; each backend turns
//! a parsed reference into a uniform [`skillet_core::IssueContext`].

mod error;
mod fetch;
mod github;
mod linear;
mod sentry;

pub use error::{Error, Result};
pub use fetch::{IssueBackend, IssueFetcher};
pub use github::GithubBackend;
pub use linear::LinearBackend;
pub use sentry::SentryBackend;
