//! Git status for listed entries.
//!
//! Whether a directory is git-managed decides if the `git` column is offered
//! at all. For entries inside a work tree, the status cell compares the entry
//! with the index: untracked entries are marked `??`, files whose size
//! differs from the staged size are marked `M`.

use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::row::Cell;
use crate::theme::Tone;

/// Tracked paths of the work tree containing a listed directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
    /// Work-tree relative path to staged size
    tracked: HashMap<PathBuf, u64>,
}

impl GitRepo {
    /// Find the work tree containing `dir`. `None` when `dir` is not
    /// git-managed (or the repository is bare).
    pub fn discover(dir: &Path) -> Option<Self> {
        let repo = gix::discover(dir).ok()?;
        let root = canonical(repo.work_dir()?);

        let tracked = match repo.index_or_empty() {
            Ok(index) => index
                .entries()
                .iter()
                .map(|e| {
                    (
                        PathBuf::from(gix::path::from_bstr(e.path(&index))),
                        u64::from(e.stat.size),
                    )
                })
                .collect(),
            Err(e) => {
                debug!(error = %e, "failed to read index");
                HashMap::new()
            }
        };
        debug!(root = %root.display(), tracked = tracked.len(), "git work tree");

        Some(Self { root, tracked })
    }

    /// Status cell for the entry at `path`.
    ///
    /// `metadata` is the entry's own (not followed) metadata, so a symlink is
    /// looked up under its own path.
    pub fn status_of(&self, path: &Path, metadata: &Metadata) -> Cell {
        let path = work_tree_path(path);
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return Cell::default();
        };
        if rel.starts_with(".git") {
            return Cell::default();
        }

        if metadata.is_dir() {
            if self.tracked.keys().any(|p| p.starts_with(rel)) {
                Cell::default()
            } else {
                Cell::toned("??", Tone::Untracked)
            }
        } else {
            match self.tracked.get(rel) {
                None => Cell::toned("??", Tone::Untracked),
                // The index stores the size truncated to 32 bits.
                Some(&size) if size != metadata.len() & u64::from(u32::MAX) => {
                    Cell::toned("M", Tone::Modified)
                }
                Some(_) => Cell::default(),
            }
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve the directory part of `path` but not its final component.
fn work_tree_path(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            canonical(parent).join(name)
        }
        _ => canonical(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// A fresh repository, or `None` where one cannot be created.
    fn init_repo() -> Option<TempDir> {
        let dir = tempdir().unwrap();
        gix::init(dir.path()).ok()?;
        Some(dir)
    }

    fn with_tracked(dir: &Path, tracked: &[(&str, u64)]) -> GitRepo {
        GitRepo {
            root: canonical(dir),
            tracked: tracked
                .iter()
                .map(|&(path, size)| (PathBuf::from(path), size))
                .collect(),
        }
    }

    fn status(repo: &GitRepo, path: &Path) -> Cell {
        repo.status_of(path, &fs::symlink_metadata(path).unwrap())
    }

    #[test]
    fn test_plain_directory_is_not_git_managed() {
        let dir = tempdir().unwrap();
        // A temp dir could sit inside a checkout; only assert when it does not.
        if gix::discover(dir.path()).is_err() {
            assert!(GitRepo::discover(dir.path()).is_none());
        }
    }

    #[test]
    fn test_untracked_file_in_fresh_repo() {
        let Some(dir) = init_repo() else { return };
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let repo = GitRepo::discover(dir.path()).expect("repo should be discovered");
        assert_eq!(status(&repo, &file), Cell::toned("??", Tone::Untracked));

        let git_dir = dir.path().join(".git");
        assert_eq!(status(&repo, &git_dir), Cell::default());
    }

    #[test]
    fn test_size_change_is_modified() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello world").unwrap();

        let repo = with_tracked(dir.path(), &[("notes.txt", 5)]);
        assert_eq!(status(&repo, &file), Cell::toned("M", Tone::Modified));

        let repo = with_tracked(dir.path(), &[("notes.txt", 11)]);
        assert_eq!(status(&repo, &file), Cell::default());
    }

    #[test]
    fn test_directory_with_tracked_children_is_clean() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();

        let repo = with_tracked(dir.path(), &[("src/lib.rs", 10)]);
        assert_eq!(status(&repo, &dir.path().join("src")), Cell::default());
        assert_eq!(
            status(&repo, &dir.path().join("target")),
            Cell::toned("??", Tone::Untracked)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_tracked_symlink_is_looked_up_by_its_own_path() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("target.txt"), "a longer file body").unwrap();
        let link = dir.path().join("link");
        symlink("target.txt", &link).unwrap();

        // The index stores a symlink with the length of its target path.
        let repo = with_tracked(dir.path(), &[("link", "target.txt".len() as u64)]);
        assert_eq!(status(&repo, &link), Cell::default());

        // Tracking only the target does not make the link tracked.
        let repo = with_tracked(dir.path(), &[("target.txt", 18)]);
        assert_eq!(status(&repo, &link), Cell::toned("??", Tone::Untracked));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_the_work_tree_is_untracked() {
        use std::os::unix::fs::symlink;

        let Some(dir) = init_repo() else { return };
        let outside = tempdir().unwrap();
        let target = outside.path().join("elsewhere.txt");
        fs::write(&target, "x").unwrap();
        let link = dir.path().join("shortcut");
        symlink(&target, &link).unwrap();

        let repo = GitRepo::discover(dir.path()).expect("repo should be discovered");
        assert_eq!(status(&repo, &link), Cell::toned("??", Tone::Untracked));
    }
}
