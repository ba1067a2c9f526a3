//! Diff source resolution
//!
//! A review runs against exactly one diff source: the uncommitted working
//! tree, a base branch, or a single commit. Explicit flags win; otherwise a
//! dirty working tree selects the uncommitted source, and a clean one drops
//! into an interactive prompt. Cancelling the prompt is a normal outcome, not
//! an error.

use std::io::BufRead;
use std::path::Path;

use crate::git::has_pending_changes;
use crate::Result;

/// What diff the review runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Staged, unstaged, and untracked changes in the working tree
    Uncommitted,

    /// Diff of the current branch against a base branch
    Base(String),

    /// Diff introduced by a single commit
    Commit(String),
}

/// Outcome of diff source resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Proceed with the given source
    Review(DiffSource),

    /// Operator chose not to review anything
    Cancelled,
}

/// Menu selection for the interactive prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareChoice {
    /// Compare against the configured default branch
    DefaultTrunk,

    /// Compare against a branch the operator names
    OtherBranch,

    /// Review a commit the operator names
    SpecificCommit,

    /// Abandon the review
    Cancel,
}

impl CompareChoice {
    /// Map raw prompt input to a choice
    ///
    /// Empty input selects the default; anything outside the menu cancels.
    pub fn from_selection(input: &str) -> Self {
        match input.trim() {
            "" | "1" => CompareChoice::DefaultTrunk,
            "2" => CompareChoice::OtherBranch,
            "3" => CompareChoice::SpecificCommit,
            _ => CompareChoice::Cancel,
        }
    }

    /// Whether this choice needs a follow-up value from the operator
    pub fn needs_detail(&self) -> bool {
        matches!(
            self,
            CompareChoice::OtherBranch | CompareChoice::SpecificCommit
        )
    }

    /// Combine the choice with its follow-up value into a resolution
    ///
    /// `detail` is the branch name or commit SHA for the choices that take
    /// one; it is ignored otherwise.
    pub fn resolve(self, detail: &str, default_base: &str) -> Resolution {
        match self {
            CompareChoice::DefaultTrunk => {
                Resolution::Review(DiffSource::Base(default_base.to_string()))
            }
            CompareChoice::OtherBranch => {
                Resolution::Review(DiffSource::Base(detail.trim().to_string()))
            }
            CompareChoice::SpecificCommit => {
                Resolution::Review(DiffSource::Commit(detail.trim().to_string()))
            }
            CompareChoice::Cancel => Resolution::Cancelled,
        }
    }
}

/// Resolve the diff source for a review
///
/// Precedence: an explicit source from the command line, then the working
/// tree if it has pending changes, then the interactive prompt.
pub fn resolve_diff_source(
    explicit: Option<DiffSource>,
    workdir: &Path,
    default_base: &str,
) -> Result<Resolution> {
    if let Some(source) = explicit {
        return Ok(Resolution::Review(source));
    }

    if has_pending_changes(workdir) {
        eprintln!("Reviewing uncommitted changes...");
        return Ok(Resolution::Review(DiffSource::Uncommitted));
    }

    prompt_for_compare_target(default_base)
}

/// Ask the operator what to review when the working tree is clean
///
/// The menu goes to stderr so stdout stays clean for primary output. End of
/// input at any prompt counts as cancelling.
pub fn prompt_for_compare_target(default_base: &str) -> Result<Resolution> {
    eprintln!("\nNo uncommitted changes found.");
    eprintln!("What would you like to review?\n");
    eprintln!("  1. Compare current branch against {}", default_base);
    eprintln!("  2. Compare current branch against another branch");
    eprintln!("  3. Review a specific commit");
    eprintln!("  4. Cancel\n");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let selection = match read_prompt(&mut input, "Select option [1]: ")? {
        Some(line) => line,
        None => return Ok(Resolution::Cancelled),
    };
    let choice = CompareChoice::from_selection(&selection);

    let detail = if choice.needs_detail() {
        let label = match choice {
            CompareChoice::OtherBranch => "Enter branch name to compare against: ",
            _ => "Enter commit SHA: ",
        };
        match read_nonempty(&mut input, label)? {
            Some(line) => line,
            None => return Ok(Resolution::Cancelled),
        }
    } else {
        String::new()
    };

    Ok(choice.resolve(&detail, default_base))
}

/// Read one line of input, returning `None` at end of input
fn read_prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    eprint!("{}", label);

    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Read until a non-empty line arrives, returning `None` at end of input
fn read_nonempty(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    loop {
        match read_prompt(input, label)? {
            Some(line) if !line.is_empty() => return Ok(Some(line)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}
