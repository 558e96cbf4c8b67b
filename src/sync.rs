use std::num::NonZeroUsize;
use std::path::Path;

use filetime::FileTime;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::types::{SyncOutcome, SyncReport, TimestampMap};

/// Which set a path came from; only used for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    File,
    Directory,
}

impl ItemKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// Apply resolved timestamps to every file and directory under `root`.
///
/// Work is spread over a dedicated pool of `concurrency` threads. Files and
/// directories are independent: a directory's time comes from history, not
/// from touching its children, so no ordering is imposed between them.
/// Per-item failures are logged and counted; they never abort the pass.
///
/// # Errors
/// Returns [`Error::Pool`] only if the worker pool cannot be started.
pub fn synchronize<S: AsRef<str>>(
    root: &Path,
    file_times: &TimestampMap,
    dir_times: &TimestampMap,
    files: &[S],
    directories: &[S],
    concurrency: NonZeroUsize,
) -> Result<SyncReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.get())
        .thread_name(|i| format!("git-mtimestamp-{i}"))
        .build()?;

    let items: Vec<(ItemKind, &str, &TimestampMap)> = files
        .iter()
        .map(|f| (ItemKind::File, f.as_ref(), file_times))
        .chain(
            directories
                .iter()
                .map(|d| (ItemKind::Directory, d.as_ref(), dir_times)),
        )
        .collect();

    let report = pool.install(|| {
        items
            .par_iter()
            .map(|&(kind, path, times)| sync_item(root, kind, path, times.get(path).copied()))
            .fold(SyncReport::new, |report, outcome| report.record(&outcome))
            .reduce(SyncReport::new, SyncReport::merge)
    });

    log::info!(
        "Processed {} of {} items ({} updated, {} skipped, {} failed)",
        report.processed,
        report.total(),
        report.updated,
        report.skipped,
        report.failed,
    );
    Ok(report)
}

fn sync_item(root: &Path, kind: ItemKind, path: &str, target: Option<i64>) -> SyncOutcome {
    let Some(target) = target else {
        log::debug!("No timestamp found for {}: {path}", kind.as_str());
        return SyncOutcome::Skipped;
    };
    match set_mtime(&root.join(path), path, target) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::warn!("{err}");
            SyncOutcome::Failed(err)
        }
    }
}

/// Set both access and modification time of `full` to `target` seconds,
/// unless its modification time already matches.
///
/// Symlinks are stamped themselves, never their targets.
///
/// # Errors
/// Returns [`Error::Stat`] if `full` cannot be stat'd and [`Error::TimeSet`]
/// if its times cannot be changed.
pub fn set_mtime(full: &Path, path: &str, target: i64) -> Result<SyncOutcome> {
    let meta = std::fs::symlink_metadata(full).map_err(|e| Error::stat(path, e))?;
    let current = FileTime::from_last_modification_time(&meta).unix_seconds();
    if current == target {
        return Ok(SyncOutcome::Unchanged);
    }

    let time = FileTime::from_unix_time(target, 0);
    filetime::set_symlink_file_times(full, time, time).map_err(|e| Error::time_set(path, e))?;

    log::debug!(
        "Updated time for {path} from {} to {}",
        display_time(current),
        display_time(target),
    );
    Ok(SyncOutcome::Updated)
}

fn display_time(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
