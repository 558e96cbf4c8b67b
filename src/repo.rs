use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git;

/// Locate the top-level directory of the work tree enclosing `start`.
///
/// # Errors
/// Returns [`Error::NotARepository`] if `start` is not inside a git work
/// tree, or [`Error::Io`] if git cannot be run at all.
pub fn resolve_root(start: &Path) -> Result<PathBuf> {
    let mut cmd = git::command(start);
    cmd.args(["rev-parse", "--show-toplevel"]);
    let output = git::run(&mut cmd, None)?;
    if !output.status.success() {
        return Err(Error::not_a_repository(start, git::failure_message(&output)));
    }

    let root = String::from_utf8(output.stdout).map_err(|e| {
        Error::not_a_repository(start, format!("work tree root is not valid UTF-8: {e}"))
    })?;
    let root = root.trim_end_matches(['\n', '\r']);
    if root.is_empty() {
        // bare repositories and the inside of .git have no work tree
        return Err(Error::not_a_repository(start, "no work tree"));
    }
    Ok(PathBuf::from(root))
}

/// List every path git tracks under `root`, sorted and deduplicated.
///
/// Output is split on NUL only, so names with spaces, tabs or newlines
/// survive intact.
///
/// # Errors
/// Returns [`Error::GitInvocation`] if `git ls-files` exits non-zero or
/// emits a path that is not valid UTF-8.
pub fn list_tracked_files(root: &Path) -> Result<Vec<String>> {
    const COMMAND: &str = "ls-files -z";

    let mut cmd = git::command(root);
    cmd.args(["ls-files", "-z"]);
    let output = git::run(&mut cmd, None)?;
    if !output.status.success() {
        return Err(Error::git_invocation(COMMAND, git::failure_message(&output)));
    }

    let mut files = output
        .stdout
        .split(|&b| b == 0)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            String::from_utf8(raw.to_vec()).map_err(|_| {
                Error::git_invocation(
                    COMMAND,
                    format!("path is not valid UTF-8: {}", String::from_utf8_lossy(raw)),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // unmerged entries appear once per stage
    files.sort();
    files.dedup();
    log::info!("Found {} tracked files", files.len());
    Ok(files)
}
