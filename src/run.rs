use std::path::Path;
use std::time::Instant;

use crate::error::Result;
use crate::types::{Options, RunSummary, TraversalMode};
use crate::{history, paths, repo, sync};

/// Reconcile every tracked file and directory in the work tree containing
/// `start` with its git history.
///
/// Root resolution, listing and both history queries must succeed before
/// anything on disk is touched; failures there abort the run. Failures on
/// individual items during synchronization are only counted.
///
/// # Errors
/// Returns the first fatal error: [`crate::Error::NotARepository`],
/// [`crate::Error::GitInvocation`], [`crate::Error::HistoryQuery`],
/// [`crate::Error::Pool`] or [`crate::Error::Io`].
pub fn run(start: &Path, options: &Options) -> Result<RunSummary> {
    let started = Instant::now();

    let root = repo::resolve_root(start)?;
    log::info!("Work tree root: {}", root.display());

    let files = repo::list_tracked_files(&root)?;
    let directories = paths::expand_directories(&files);
    log::info!("Found {} directories", directories.len());

    let file_times = history::resolve_timestamps(&root, &files, TraversalMode::Files)?;
    let dir_times = history::resolve_timestamps(&root, &directories, TraversalMode::Directories)?;

    let report = sync::synchronize(
        &root,
        &file_times,
        &dir_times,
        &files,
        &directories,
        options.concurrency,
    )?;

    Ok(RunSummary {
        report,
        elapsed: started.elapsed(),
    })
}
