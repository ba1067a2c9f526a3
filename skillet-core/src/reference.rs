//! Issue reference grammar
//!
//! References arrive as free-form tokens from the command line and are matched
//! against an ordered rule list; the first rule that matches wins. Supported
//! shapes:
//!
//! - GitHub: `https://github.com/org/repo/issues/123` (or `/pull/123`),
//!   `org/repo#123`, `#123`
//! - Linear: `https://linear.app/team/issue/PROJ-123`, `PROJ-123`
//! - Sentry: `https://org.sentry.io/issues/12345`, `sentry:12345`
//!
//! A token that matches no rule is not an error here; callers decide how to
//! report it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// Which issue tracker a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Github,
    Linear,
    Sentry,
}

impl ReferenceKind {
    /// Lowercase tracker name
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceKind::Github => "github",
            ReferenceKind::Linear => "linear",
            ReferenceKind::Sentry => "sentry",
        }
    }

    /// Uppercase tracker name for section headers
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Github => "GITHUB",
            ReferenceKind::Linear => "LINEAR",
            ReferenceKind::Sentry => "SENTRY",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A parsed issue reference
///
/// `repo` is only populated for GitHub references that carry an explicit
/// `owner/repo`; bare `#123` references leave it empty and the repository is
/// inferred from the working directory at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReference {
    /// Tracker this reference belongs to
    #[serde(rename = "type")]
    pub kind: ReferenceKind,

    /// Tracker-native identifier (issue number, Linear key, Sentry id)
    pub id: String,

    /// GitHub repository in `owner/repo` form, when given explicitly
    pub repo: Option<String>,
}

impl IssueReference {
    /// Create a GitHub reference
    pub fn github(id: impl Into<String>, repo: Option<String>) -> Self {
        Self {
            kind: ReferenceKind::Github,
            id: id.into(),
            repo,
        }
    }

    /// Create a Linear reference
    pub fn linear(id: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Linear,
            id: id.into(),
            repo: None,
        }
    }

    /// Create a Sentry reference
    pub fn sentry(id: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Sentry,
            id: id.into(),
            repo: None,
        }
    }
}

type BuildRef = fn(&Captures) -> IssueReference;

/// Ordered reference rules; earlier rules shadow later ones
static RULES: Lazy<Vec<(Regex, BuildRef)>> = Lazy::new(|| {
    vec![
        // GitHub URL: https://github.com/org/repo/issues/123 (or /pull/123)
        (
            Regex::new(r"^https?://github\.com/([^/]+/[^/]+)/(?:issues|pull)/(\d+)")
                .expect("regex: github url"),
            |caps| IssueReference::github(&caps[2], Some(caps[1].to_string())),
        ),
        // GitHub shorthand: org/repo#123
        (
            Regex::new(r"^([^/]+/[^#]+)#(\d+)$").expect("regex: github shorthand"),
            |caps| IssueReference::github(&caps[2], Some(caps[1].to_string())),
        ),
        // GitHub current-repo: #123
        (
            Regex::new(r"^#(\d+)$").expect("regex: github number"),
            |caps| IssueReference::github(&caps[1], None),
        ),
        // Linear URL: https://linear.app/team/issue/PROJ-123
        (
            Regex::new(r"^https?://linear\.app/[^/]+/issue/([A-Z]+-[A-Z0-9]+)")
                .expect("regex: linear url"),
            |caps| IssueReference::linear(&caps[1]),
        ),
        // Linear key: PROJ-123
        (
            Regex::new(r"^([A-Z]+-[A-Z0-9]+)$").expect("regex: linear key"),
            |caps| IssueReference::linear(&caps[1]),
        ),
        // Sentry URL: https://sentry.io/issues/12345 or https://org.sentry.io/issues/12345
        (
            Regex::new(r"^https?://[^/]*sentry\.io/issues/(\d+)").expect("regex: sentry url"),
            |caps| IssueReference::sentry(&caps[1]),
        ),
        // Sentry shorthand: sentry:12345
        (
            Regex::new(r"^sentry:(\d+)$").expect("regex: sentry shorthand"),
            |caps| IssueReference::sentry(&caps[1]),
        ),
    ]
});

/// Parse a single reference token
///
/// Leading and trailing whitespace is ignored. Returns `None` when no rule
/// matches.
pub fn parse_reference(token: &str) -> Option<IssueReference> {
    let token = token.trim();

    for (pattern, build) in RULES.iter() {
        if let Some(caps) = pattern.captures(token) {
            return Some(build(&caps));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_issue_url() {
        let reference = parse_reference("https://github.com/acme/widgets/issues/42").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Github);
        assert_eq!(reference.id, "42");
        assert_eq!(reference.repo, Some("acme/widgets".to_string()));
    }

    #[test]
    fn test_github_pull_url() {
        let reference = parse_reference("http://github.com/acme/widgets/pull/7").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Github);
        assert_eq!(reference.id, "7");
        assert_eq!(reference.repo, Some("acme/widgets".to_string()));
    }

    #[test]
    fn test_github_shorthand() {
        let reference = parse_reference("acme/widgets#123").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Github);
        assert_eq!(reference.id, "123");
        assert_eq!(reference.repo, Some("acme/widgets".to_string()));
    }

    #[test]
    fn test_github_current_repo() {
        let reference = parse_reference("#99").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Github);
        assert_eq!(reference.id, "99");
        assert_eq!(reference.repo, None);
    }

    #[test]
    fn test_linear_url() {
        let reference = parse_reference("https://linear.app/acme/issue/ENG-123").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Linear);
        assert_eq!(reference.id, "ENG-123");
        assert_eq!(reference.repo, None);
    }

    #[test]
    fn test_linear_key() {
        let reference = parse_reference("PROJ-456").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Linear);
        assert_eq!(reference.id, "PROJ-456");
    }

    #[test]
    fn test_linear_key_with_digits_and_letters() {
        let reference = parse_reference("OPS-1A2B").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Linear);
        assert_eq!(reference.id, "OPS-1A2B");
    }

    #[test]
    fn test_sentry_url() {
        let reference = parse_reference("https://sentry.io/issues/5678").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Sentry);
        assert_eq!(reference.id, "5678");
    }

    #[test]
    fn test_sentry_org_url() {
        let reference = parse_reference("https://acme.sentry.io/issues/5678").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Sentry);
        assert_eq!(reference.id, "5678");
    }

    #[test]
    fn test_sentry_shorthand() {
        let reference = parse_reference("sentry:31415").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Sentry);
        assert_eq!(reference.id, "31415");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let reference = parse_reference("  #12  ").unwrap();
        assert_eq!(reference.id, "12");
    }

    #[test]
    fn test_linear_key_never_github() {
        // No '#' or '/', so the GitHub rules cannot claim it
        let reference = parse_reference("ABC-123").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Linear);
    }

    #[test]
    fn test_unrecognized_tokens() {
        assert!(parse_reference("").is_none());
        assert!(parse_reference("not-a-reference").is_none());
        assert!(parse_reference("123").is_none());
        assert!(parse_reference("abc-123").is_none());
        assert!(parse_reference("sentry:x9").is_none());
        assert!(parse_reference("https://example.com/issues/5").is_none());
    }

    #[test]
    fn test_github_url_wins_over_shorthand() {
        // The URL rule is checked first even though later rules could not
        // match this token anyway
        let reference = parse_reference("https://github.com/a/b/issues/1").unwrap();
        assert_eq!(reference.repo, Some("a/b".to_string()));
    }
}
