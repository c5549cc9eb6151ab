//! Remote snapshot fetching.
//!
//! A [`Snapshot`] is a one-shot, shallow checkout of the skills repository.
//! Every operation that reads remote skills works inside one snapshot, and
//! the checkout is removed when the snapshot is dropped, whether the
//! operation succeeded or not.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{Result, SkillSyncError};

/// Local view of the remote repository.
#[derive(Debug)]
pub struct Snapshot {
    root: SnapshotRoot,
}

#[derive(Debug)]
enum SnapshotRoot {
    /// Temporary checkout, deleted on drop.
    Owned(TempDir),
    /// Existing directory, left untouched.
    Borrowed(PathBuf),
}

impl Snapshot {
    /// Wrap an existing directory. Nothing is deleted on drop.
    #[must_use]
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            root: SnapshotRoot::Borrowed(path.into()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        match &self.root {
            SnapshotRoot::Owned(dir) => dir.path(),
            SnapshotRoot::Borrowed(path) => path,
        }
    }
}

/// Something that can produce a snapshot of a repository.
pub trait SnapshotSource {
    fn fetch(&self, repository: &str) -> Result<Snapshot>;
}

/// Shallow clone through the `git` command line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    git_path: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    #[must_use]
    pub fn new() -> Self {
        Self {
            git_path: PathBuf::from("git"),
        }
    }

    #[must_use]
    pub const fn with_path(git_path: PathBuf) -> Self {
        Self { git_path }
    }

    fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.git_path).map_err(|err| {
            SkillSyncError::Fetch(format!(
                "git client not available ({}): {err}",
                self.git_path.display()
            ))
        })
    }
}

impl SnapshotSource for GitCli {
    fn fetch(&self, repository: &str) -> Result<Snapshot> {
        let git = self.resolve()?;
        let dir = tempfile::Builder::new()
            .prefix("skillsync-")
            .tempdir()
            .map_err(|err| SkillSyncError::Fetch(format!("create temp dir: {err}")))?;

        info!(repository, "fetching latest skills");
        let output = Command::new(&git)
            .args(["clone", "--depth", "1", "--quiet", repository])
            .arg(dir.path())
            .output()
            .map_err(|err| SkillSyncError::Fetch(format!("failed to execute git clone: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SkillSyncError::Fetch(format!(
                "git clone {repository} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        debug!(path = %dir.path().display(), "snapshot ready");
        Ok(Snapshot {
            root: SnapshotRoot::Owned(dir),
        })
    }
}

/// Serves an existing directory as the snapshot, ignoring the repository URL.
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    path: PathBuf,
}

impl LocalSnapshot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for LocalSnapshot {
    fn fetch(&self, _repository: &str) -> Result<Snapshot> {
        if !self.path.is_dir() {
            return Err(SkillSyncError::Fetch(format!(
                "{} is not a directory",
                self.path.display()
            )));
        }
        Ok(Snapshot::from_dir(&self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn borrowed_snapshot_keeps_directory() {
        let dir = tempdir().unwrap();
        let snapshot = LocalSnapshot::new(dir.path()).fetch("ignored").unwrap();
        assert_eq!(snapshot.root(), dir.path());
        drop(snapshot);
        assert!(dir.path().exists());
    }

    #[test]
    fn local_snapshot_requires_directory() {
        let dir = tempdir().unwrap();
        let err = LocalSnapshot::new(dir.path().join("missing"))
            .fetch("ignored")
            .unwrap_err();
        assert!(matches!(err, SkillSyncError::Fetch(_)));
    }

    #[test]
    fn owned_snapshot_is_removed_on_drop() {
        let dir = tempfile::Builder::new().prefix("skillsync-").tempdir().unwrap();
        let path = dir.path().to_path_buf();
        let snapshot = Snapshot {
            root: SnapshotRoot::Owned(dir),
        };
        assert!(snapshot.root().exists());
        drop(snapshot);
        assert!(!path.exists());
    }

    #[test]
    fn missing_git_binary_is_fetch_error() {
        let git = GitCli::with_path(PathBuf::from("definitely-not-a-git-binary-xyz"));
        let err = git.fetch("https://example.com/repo.git").unwrap_err();
        assert!(matches!(err, SkillSyncError::Fetch(_)));
    }

    #[test]
    fn unreachable_remote_is_fetch_error() {
        if which::which("git").is_err() {
            return;
        }
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-repo");
        let err = GitCli::new()
            .fetch(missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, SkillSyncError::Fetch(_)));
    }
}
