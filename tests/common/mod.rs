use std::path::{Path, PathBuf};

use filetime::FileTime;
use git2::{Oid, Repository, Signature, Time};

/// A throwaway work tree whose commits carry exact committer times.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        TestRepo { dir, repo }
    }

    /// The work-tree root as git reports it (symlinks resolved).
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `files` into the work tree, stage them, and commit on HEAD.
    pub fn commit(&self, files: &[(&str, &str)], time: i64) -> Oid {
        let mut index = self.repo.index().unwrap();
        for (rel, contents) in files {
            let full = self.path(rel);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&full, contents).unwrap();
            index.add_path(Path::new(rel)).unwrap();
        }
        index.write().unwrap();
        let tree = index.write_tree().unwrap();

        let parents: Vec<Oid> = match self.repo.head() {
            Ok(head) => vec![head.target().unwrap()],
            Err(_) => vec![],
        };
        self.commit_tree(tree, &parents, time, Some("HEAD"))
    }

    /// Commit an existing tree with explicit parents, optionally moving a ref.
    pub fn commit_tree(&self, tree: Oid, parents: &[Oid], time: i64, update_ref: Option<&str>) -> Oid {
        let sig = signature(time);
        let tree = self.repo.find_tree(tree).unwrap();
        let parents: Vec<git2::Commit<'_>> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(update_ref, &sig, &sig, &format!("commit at {time}"), &tree, &parent_refs)
            .unwrap()
    }

    /// Stage `rel` without committing it.
    #[allow(dead_code)]
    pub fn stage(&self, rel: &str, contents: &str) {
        std::fs::write(self.path(rel), contents).unwrap();
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
    }

    /// Stage everything and commit through the git CLI, for names libgit2
    /// may refuse.
    #[allow(dead_code)]
    pub fn cli_commit_all(&self, time: i64) {
        let date = format!("@{time} +0000");
        for args in [&["add", "-A"][..], &["commit", "-q", "-m", "cli commit"][..]] {
            let status = std::process::Command::new("git")
                .args(args)
                .current_dir(self.dir.path())
                .env("GIT_AUTHOR_NAME", "Test")
                .env("GIT_AUTHOR_EMAIL", "test@localhost")
                .env("GIT_COMMITTER_NAME", "Test")
                .env("GIT_COMMITTER_EMAIL", "test@localhost")
                .env("GIT_AUTHOR_DATE", &date)
                .env("GIT_COMMITTER_DATE", &date)
                .status()
                .unwrap();
            assert!(status.success(), "git {args:?} failed");
        }
    }

    #[allow(dead_code)]
    pub fn tree_of(&self, commit: Oid) -> Oid {
        self.repo.find_commit(commit).unwrap().tree_id()
    }
}

pub fn signature(time: i64) -> Signature<'static> {
    Signature::new("Test", "test@localhost", &Time::new(time, 0)).unwrap()
}

#[allow(dead_code)]
pub fn mtime(path: &Path) -> i64 {
    let meta = std::fs::symlink_metadata(path).unwrap();
    FileTime::from_last_modification_time(&meta).unix_seconds()
}

/// `x.txt` and `docs/guide.md` added at 1000; `y.txt` and `docs/new.md`
/// added and `x.txt` changed at 2000.
#[allow(dead_code)]
pub fn two_commit_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.commit(&[("x.txt", "one"), ("docs/guide.md", "guide")], 1000);
    repo.commit(&[("y.txt", "why"), ("x.txt", "two"), ("docs/new.md", "new")], 2000);
    repo
}

/// `dir/sub/file.txt` gets the same new content on main (2000) and on a
/// side branch (2500), merged at 3000. The merge is TREESAME to both
/// parents, so default history simplification drops the side commit.
#[allow(dead_code)]
pub fn side_branch_repo() -> TestRepo {
    let repo = TestRepo::new();
    let base = repo.commit(&[("dir/sub/file.txt", "base"), ("top.txt", "top")], 1000);
    let main = repo.commit(&[("dir/sub/file.txt", "changed")], 2000);
    let tree = repo.tree_of(main);
    let side = repo.commit_tree(tree, &[base], 2500, None);
    repo.commit_tree(tree, &[main, side], 3000, Some("HEAD"));
    repo
}
