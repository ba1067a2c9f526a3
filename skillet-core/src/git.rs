//! Git working-tree status probe

use std::path::Path;

use tracing::debug;

/// Check whether a working tree has uncommitted changes
///
/// Runs `git status --porcelain` in the given directory; any output means the
/// tree is dirty. If git is missing, the directory is not a repository, or the
/// command fails for any other reason, the tree is treated as clean so the
/// caller falls through to asking the operator what to review.
pub fn has_pending_changes(dir: impl AsRef<Path>) -> bool {
    let output = std::process::Command::new("git")
        .arg("status")
        .arg("--porcelain")
        .current_dir(dir.as_ref())
        .output();

    match output {
        Ok(output) if output.status.success() => !output.stdout.is_empty(),
        Ok(output) => {
            debug!(status = ?output.status, "git status failed, treating tree as clean");
            false
        }
        Err(e) => {
            debug!(error = %e, "could not run git, treating tree as clean");
            false
        }
    }
}
