//! Resolve per-path commit times from `git log`.
//!
//! The log is requested with `--format=%x00%ct -z --name-only`, which turns
//! every commit into an empty token, a committer-time token, and then the
//! NUL-terminated paths it touched:
//!
//! ```text
//! \0 1700000300 \0 \n a.txt \0 b.txt \0 \0 1700000100 \0 \n a.txt \0
//! ```
//!
//! The empty token is the only thing that marks a commit header, so a file
//! whose name is all digits is still read as a path. Git writes one `\n`
//! between a header and its first path; that byte is dropped. Merges that
//! show no diff contribute a header with no paths.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, LogFormatError, Result};
use crate::git;
use crate::paths;
use crate::types::{TimestampMap, TraversalMode};

// ---------------------------------------------------------------------------
// Token stream
// ---------------------------------------------------------------------------

/// One tagged record from the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRecord<'a> {
    /// Committer time of the commit whose paths follow.
    CommitTime(i64),
    /// A path touched by the most recent commit.
    Path(&'a str),
}

/// Streaming reader over raw `git log -z` output.
#[derive(Debug, Clone)]
pub struct LogReader<'a> {
    rest: &'a [u8],
    seen_commit: bool,
    at_first_path: bool,
    failed: bool,
}

impl<'a> LogReader<'a> {
    pub fn new(output: &'a [u8]) -> Self {
        Self {
            rest: output,
            seen_commit: false,
            at_first_path: false,
            failed: false,
        }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.iter().position(|&b| b == 0) {
            Some(end) => {
                let token = &self.rest[..end];
                self.rest = &self.rest[end + 1..];
                Some(token)
            }
            None => {
                let token = self.rest;
                self.rest = &[];
                Some(token)
            }
        }
    }

    fn header(&mut self, raw: &'a [u8]) -> std::result::Result<LogRecord<'a>, LogFormatError> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| LogFormatError::NotUtf8(lossy(raw)))?
            .trim();
        let time = text
            .parse::<i64>()
            .map_err(|_| LogFormatError::InvalidCommitTime(text.to_string()))?;
        self.seen_commit = true;
        self.at_first_path = true;
        Ok(LogRecord::CommitTime(time))
    }
}

impl<'a> Iterator for LogReader<'a> {
    type Item = std::result::Result<LogRecord<'a>, LogFormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = loop {
            let mut token = self.next_token()?;

            if token.is_empty() {
                match self.next_token() {
                    Some(raw) => break self.header(raw),
                    // trailing separator
                    None => return None,
                }
            }

            if self.at_first_path {
                self.at_first_path = false;
                token = token.strip_prefix(b"\n").unwrap_or(token);
                if token.is_empty() {
                    continue;
                }
            }

            let path = match std::str::from_utf8(token) {
                Ok(path) => path,
                Err(_) => break Err(LogFormatError::NotUtf8(lossy(token))),
            };
            if !self.seen_commit {
                break Err(LogFormatError::PathBeforeCommit(path.to_string()));
            }
            break Ok(LogRecord::Path(path));
        };
        self.failed = item.is_err();
        Some(item)
    }
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

// ---------------------------------------------------------------------------
// Attribution
// ---------------------------------------------------------------------------

/// Timestamps built from one log stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub timestamps: TimestampMap,
    /// Number of commit headers seen in the stream.
    pub commits: usize,
}

/// Apply a log stream to the queried path set under first-seen-wins.
///
/// Paths outside `queried` are ignored. In [`TraversalMode::Directories`]
/// each touched path also stamps its queried ancestors.
pub fn collect_timestamps<S: AsRef<str>>(
    output: &[u8],
    queried: &[S],
    mode: TraversalMode,
) -> std::result::Result<Resolution, LogFormatError> {
    let wanted: HashSet<&str> = queried.iter().map(AsRef::as_ref).collect();
    let mut resolution = Resolution::default();
    let mut current = 0i64;

    for record in LogReader::new(output) {
        match record? {
            LogRecord::CommitTime(time) => {
                current = time;
                resolution.commits += 1;
            }
            LogRecord::Path(path) => {
                let map = &mut resolution.timestamps;
                if wanted.contains(path) && !map.contains_key(path) {
                    map.insert(path.to_string(), current);
                    log_resolved(mode, path, current);
                }
                if mode.credits_ancestors() {
                    for dir in paths::ancestors(path) {
                        if !wanted.contains(dir) {
                            continue;
                        }
                        // a stamped ancestor has stamped ancestors of its own
                        if map.contains_key(dir) {
                            break;
                        }
                        map.insert(dir.to_string(), current);
                        log_resolved(mode, dir, current);
                    }
                }
            }
        }
    }
    Ok(resolution)
}

fn log_resolved(mode: TraversalMode, path: &str, time: i64) {
    if log::log_enabled!(log::Level::Debug) {
        let when = chrono::DateTime::from_timestamp(time, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| time.to_string());
        log::debug!("{mode}: {path}, Timestamp: {when}");
    }
}

// ---------------------------------------------------------------------------
// git log invocation
// ---------------------------------------------------------------------------

/// Build the stdin payload for `git log --stdin` and split off the paths
/// that cannot be expressed as a line.
///
/// Returns `(stdin, argv_paths)`.
pub(crate) fn pathspec_input<S: AsRef<str>>(paths: &[S]) -> (Vec<u8>, Vec<&str>) {
    let mut stdin = b"--\n".to_vec();
    let mut argv = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.contains(['\n', '\r']) {
            argv.push(path);
        } else {
            stdin.extend_from_slice(path.as_bytes());
            stdin.push(b'\n');
        }
    }
    (stdin, argv)
}

/// Resolve the newest commit time for each of `paths` under `root`.
///
/// A single `git log` is run, scoped to `paths` and walking history the way
/// `mode` requires. Paths that no commit touched are absent from the result.
///
/// # Errors
/// Returns [`Error::HistoryQuery`] if git exits non-zero or its output is
/// malformed, and [`Error::Io`] if git cannot be started.
pub fn resolve_timestamps<S: AsRef<str>>(
    root: &Path,
    paths: &[S],
    mode: TraversalMode,
) -> Result<TimestampMap> {
    if paths.is_empty() {
        // an empty pathspec would select the whole history
        log::info!("No {mode} to query");
        return Ok(TimestampMap::new());
    }

    let (stdin, argv_paths) = pathspec_input(paths);

    let mut cmd = git::command(root);
    cmd.args([
        "-c",
        "log.showSignature=false",
        "-c",
        "log.showRoot=true",
        "-c",
        "log.follow=false",
        "--literal-pathspecs",
        "log",
        "--name-only",
        "--no-renames",
        "-z",
        "--format=%x00%ct",
    ]);
    if mode.full_history() {
        cmd.arg("--full-history");
    }
    cmd.arg("--stdin").arg("--").args(&argv_paths);

    let output = git::run(&mut cmd, Some(&stdin))?;
    if !output.status.success() {
        return Err(Error::history_query(
            mode,
            paths.len(),
            git::failure_message(&output),
        ));
    }

    let resolution = collect_timestamps(&output.stdout, paths, mode)
        .map_err(|e| Error::history_query(mode, paths.len(), e))?;

    log::info!("Got timestamps for {} {mode}", resolution.timestamps.len());
    log::info!("Found {} unique timestamps for {mode}", resolution.commits);
    Ok(resolution.timestamps)
}
