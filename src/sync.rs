//! Skill synchronization.
//!
//! Brings each target directory in line with the snapshot by full
//! replacement: the snapshot subtree is copied into a hidden staging
//! directory next to the destination, the old installation is removed and
//! the staging directory is renamed into place. A target that fails is
//! recorded in the [`SyncReport`] and the pass moves on to the next one.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::deps::{CommandRunner, DependencyManager, DependencyReport, SystemRunner};
use crate::error::{Result, SkillSyncError};
use crate::fetch::Snapshot;

/// One skill to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncTarget {
    pub name: String,
    /// Path inside the snapshot; `None` when the name is not configured.
    pub source: Option<String>,
}

impl SyncTarget {
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: Some(source.into()),
        }
    }
}

/// Look up `names` in the configuration, preserving order and dropping
/// duplicates.
#[must_use]
pub fn resolve_targets(config: &Config, names: &[String]) -> Vec<SyncTarget> {
    let mut targets: Vec<SyncTarget> = Vec::with_capacity(names.len());
    for name in names {
        if targets.iter().any(|t| &t.name == name) {
            continue;
        }
        targets.push(SyncTarget {
            name: name.clone(),
            source: config.skills.get(name).cloned(),
        });
    }
    targets
}

/// Every configured skill, in configuration order.
#[must_use]
pub fn all_targets(config: &Config) -> Vec<SyncTarget> {
    config
        .skills
        .iter()
        .map(|(name, path)| SyncTarget::new(name, path))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkillStatus {
    Installed,
    /// An existing installation was replaced.
    Updated,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: SkillStatus,
    pub destination: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyReport>,
}

impl SkillOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.status, SkillStatus::Failed { .. })
    }

    #[must_use]
    pub fn dependency_failures(&self) -> &[String] {
        self.dependencies
            .as_ref()
            .map(|report| report.failures.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub destination: PathBuf,
    pub skills: Vec<SkillOutcome>,
}

impl SyncReport {
    #[must_use]
    pub fn succeeded(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| s.is_success())
            .map(|s| s.name.as_str())
            .collect()
    }

    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| !s.is_success())
            .map(|s| s.name.as_str())
            .collect()
    }
}

/// Progress notifications emitted while a pass runs.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    Started { name: &'a str, replacing: bool },
    Finished(&'a SkillOutcome),
}

pub struct Synchronizer<'a, R: CommandRunner = SystemRunner> {
    destination: PathBuf,
    deps: DependencyManager<'a, R>,
}

impl<'a, R: CommandRunner> Synchronizer<'a, R> {
    pub fn new(destination: impl Into<PathBuf>, deps: DependencyManager<'a, R>) -> Self {
        Self {
            destination: destination.into(),
            deps,
        }
    }

    /// Install every target from `snapshot`, in order.
    ///
    /// Only failing to create the destination base aborts the pass; every
    /// other failure is isolated to its target.
    pub fn run(
        &self,
        snapshot: &Snapshot,
        targets: &[SyncTarget],
        mut observe: impl FnMut(SyncEvent<'_>),
    ) -> Result<SyncReport> {
        if !self.destination.exists() {
            std::fs::create_dir_all(&self.destination)?;
            info!(path = %self.destination.display(), "created destination");
        }

        let mut report = SyncReport {
            destination: self.destination.clone(),
            skills: Vec::with_capacity(targets.len()),
        };

        for target in targets {
            let destination = self.destination.join(&target.name);
            observe(SyncEvent::Started {
                name: &target.name,
                replacing: destination.symlink_metadata().is_ok(),
            });

            let outcome = match self.sync_one(snapshot.root(), target, &destination) {
                Ok(status) => {
                    let deps = self.deps.install(&target.name, &destination);
                    SkillOutcome {
                        name: target.name.clone(),
                        status,
                        destination,
                        dependencies: Some(deps),
                    }
                }
                Err(err) => {
                    warn!(skill = %target.name, "{err}");
                    SkillOutcome {
                        name: target.name.clone(),
                        status: SkillStatus::Failed {
                            reason: err.to_string(),
                        },
                        destination,
                        dependencies: None,
                    }
                }
            };

            observe(SyncEvent::Finished(&outcome));
            report.skills.push(outcome);
        }

        Ok(report)
    }

    fn sync_one(&self, root: &Path, target: &SyncTarget, destination: &Path) -> Result<SkillStatus> {
        let copy_err = |reason: String| SkillSyncError::Copy {
            skill: target.name.clone(),
            reason,
        };

        let Some(relative) = target.source.as_deref() else {
            return Err(SkillSyncError::SkillNotFound(format!(
                "'{}' is not in the configuration",
                target.name
            )));
        };
        if !is_plain_name(&target.name) {
            return Err(copy_err("invalid skill name".to_string()));
        }
        if !is_contained(relative) {
            return Err(copy_err(format!("source path {relative} escapes the repository")));
        }

        let source = root.join(relative);
        if !source.is_dir() {
            return Err(copy_err(format!("source not found at {relative}")));
        }

        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", target.name))
            .suffix(".partial")
            .tempdir_in(&self.destination)
            .map_err(|err| copy_err(format!("create staging dir: {err}")))?;
        copy_tree(&source, staging.path()).map_err(|err| copy_err(err.to_string()))?;

        let replacing = match destination.symlink_metadata() {
            Ok(meta) if meta.is_dir() => {
                std::fs::remove_dir_all(destination)
                    .map_err(|err| copy_err(format!("remove existing installation: {err}")))?;
                true
            }
            Ok(_) => {
                std::fs::remove_file(destination)
                    .map_err(|err| copy_err(format!("remove existing installation: {err}")))?;
                true
            }
            Err(_) => false,
        };

        // The staging guard's own cleanup is a no-op once the directory has moved.
        std::fs::rename(staging.path(), destination)
            .map_err(|err| copy_err(format!("move into place: {err}")))?;

        debug!(skill = %target.name, replacing, "copied");
        Ok(if replacing {
            SkillStatus::Updated
        } else {
            SkillStatus::Installed
        })
    }
}

/// Names become a single directory under the destination.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Recursively copy `source` into the existing directory `dest`.
pub fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(std::io::Error::other)?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(std::fs::read_link(link)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::fs::copy(link, target).map(|_| ())
}
