//! Reproducible modification times for git checkouts.
//!
//! A fresh clone stamps every file with the checkout time, which defeats
//! build systems and layer caches keyed on mtime. `git_mtimestamp` sets each
//! tracked file to the committer time of the newest commit that touched it,
//! and each directory to the newest commit that touched anything beneath it.
//!
//! # Pipeline
//!
//! - [`repo`]: find the work-tree root and list tracked files.
//! - [`paths`]: derive the ancestor directories of those files.
//! - [`history`]: one `git log` per path set, parsed into a
//!   [`TimestampMap`]. Directories use `--full-history` so changes that
//!   arrive only through merged side branches are still seen.
//! - [`sync`]: apply the maps to disk on a bounded worker pool, skipping
//!   paths that already match.
//! - [`run()`]: all of the above in order.
//!
//! # Quick example
//!
//! ```rust,no_run
//! use git_mtimestamp::{run, Options};
//!
//! let summary = run(std::path::Path::new("."), &Options::default()).unwrap();
//! println!("{summary}");
//! ```

pub mod error;
pub mod git;
pub mod history;
pub mod paths;
pub mod repo;
pub mod run;
pub mod sync;
pub mod types;

// Re-export primary public types at crate root.
pub use error::{Error, LogFormatError, Result};
pub use history::{resolve_timestamps, LogReader, LogRecord};
pub use run::run;
pub use sync::synchronize;
pub use types::*;
