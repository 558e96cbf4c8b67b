use std::path::PathBuf;

use crate::types::TraversalMode;

/// All errors produced by git-mtimestamp.
///
/// `Stat` and `TimeSet` are per-item failures: the synchronizer logs and
/// counts them without aborting. Every other variant is fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a git repository: {}: {message}", path.display())]
    NotARepository { path: PathBuf, message: String },

    #[error("`git {command}` failed: {message}")]
    GitInvocation { command: String, message: String },

    #[error("failed to get git log for {paths} {mode}: {cause}")]
    HistoryQuery {
        mode: TraversalMode,
        paths: usize,
        cause: String,
    },

    #[error("failed to stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update time for {path}: {source}")]
    TimeSet {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A malformed `git log` token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogFormatError {
    #[error("invalid commit time {0:?}")]
    InvalidCommitTime(String),

    #[error("output is not valid UTF-8 near {0:?}")]
    NotUtf8(String),

    #[error("path {0:?} appears before any commit")]
    PathBeforeCommit(String),
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl Error {
    pub fn not_a_repository(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::NotARepository {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn git_invocation(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GitInvocation {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn history_query(mode: TraversalMode, paths: usize, cause: impl ToString) -> Self {
        Self::HistoryQuery {
            mode,
            paths,
            cause: cause.to_string(),
        }
    }

    pub fn stat(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    pub fn time_set(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::TimeSet {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is isolated to a single synchronized item.
    pub fn is_per_item(&self) -> bool {
        matches!(self, Self::Stat { .. } | Self::TimeSet { .. })
    }
}
