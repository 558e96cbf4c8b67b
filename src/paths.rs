use std::collections::BTreeSet;

/// Returns `true` when the path names the repository root
/// (empty string, `.`, or only slashes).
pub fn is_root_path(path: &str) -> bool {
    path == "." || path.chars().all(|c| c == '/')
}

/// The parent directory of a repository-relative path, or `None` for a
/// top-level entry.
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    let (dir, _) = trimmed.rsplit_once('/')?;
    let dir = dir.trim_end_matches('/');
    if is_root_path(dir) {
        None
    } else {
        Some(dir)
    }
}

/// Iterate the proper ancestors of `path`, nearest first.
///
/// `a/b/c.txt` yields `a/b` then `a`. The root is never yielded.
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors { next: parent(path) }
}

/// Iterator returned by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;
        self.next = parent(current);
        Some(current)
    }
}

/// Collect every ancestor directory implied by `files`, sorted and
/// deduplicated. The root sentinel and the files themselves are excluded.
pub fn expand_directories<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let mut dirs: BTreeSet<&str> = BTreeSet::new();
    for file in files {
        for dir in ancestors(file.as_ref()) {
            // an ancestor already present means the rest of the chain is too
            if !dirs.insert(dir) {
                break;
            }
        }
    }
    dirs.into_iter().map(str::to_owned).collect()
}
