//! CLI command implementations

pub mod context;
pub mod keywords;
pub mod research;
pub mod review;
pub mod search;

pub use context::ContextArgs;
pub use keywords::KeywordsArgs;
pub use research::ResearchArgs;
pub use review::ReviewArgs;
pub use search::SearchArgs;
