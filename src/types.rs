use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Timestamp map
// ---------------------------------------------------------------------------

/// Repository-relative path to Unix epoch seconds of the newest commit that
/// touched it.
pub type TimestampMap = HashMap<String, i64>;

// ---------------------------------------------------------------------------
// TraversalMode
// ---------------------------------------------------------------------------

/// How `git log` walks history for a timestamp query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalMode {
    /// Default traversal; a token counts only for the exact path queried.
    Files,
    /// `--full-history`; a touched file stamps every queried ancestor.
    Directories,
}

impl TraversalMode {
    /// Whether the query needs `--full-history`.
    pub fn full_history(self) -> bool {
        matches!(self, Self::Directories)
    }

    /// Whether a touched path is credited to its queried ancestors.
    pub fn credits_ancestors(self) -> bool {
        matches!(self, Self::Directories)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Directories => "directories",
        }
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Worker pool size used when none is configured.
pub const DEFAULT_CONCURRENCY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Options for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of stat/set-time operations in flight.
    pub concurrency: NonZeroUsize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// What happened to a single path during synchronization.
#[derive(Debug)]
pub enum SyncOutcome {
    /// No timestamp was resolved for the path.
    Skipped,
    /// The mtime already matched.
    Unchanged,
    /// The mtime was changed.
    Updated,
    /// Stat or set-time failed; the error is always per-item.
    Failed(crate::Error),
}

/// Aggregated counts from a synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Items that had a timestamp, whether or not they changed.
    pub processed: usize,
    /// Items whose mtime was actually changed.
    pub updated: usize,
    /// Items with no resolved timestamp.
    pub skipped: usize,
    /// Items whose stat or set-time failed.
    pub failed: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the counts.
    pub fn record(mut self, outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Skipped => self.skipped += 1,
            SyncOutcome::Unchanged => self.processed += 1,
            SyncOutcome::Updated => {
                self.processed += 1;
                self.updated += 1;
            }
            SyncOutcome::Failed(_) => {
                self.processed += 1;
                self.failed += 1;
            }
        }
        self
    }

    /// Combine two partial reports.
    pub fn merge(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            updated: self.updated + other.updated,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }

    /// Total number of paths considered.
    pub fn total(&self) -> usize {
        self.processed + self.skipped
    }

    /// True when nothing needed changing.
    pub fn in_sync(&self) -> bool {
        self.updated == 0 && self.failed == 0
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Result of a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub report: SyncReport,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} items, updated {} items in {:?}",
            self.report.processed, self.report.updated, self.elapsed,
        )
    }
}
