//! Per-skill dependency installation.
//!
//! Runs after a skill has been copied. Two sources of work:
//! - a manifest file (`requirements.txt` by default) in the skill directory
//! - the configured [`DependencyRule`] table, matched against the skill name
//!
//! Everything here is best effort: failures are collected in the
//! [`DependencyReport`] and never undo the copy.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DependencyConfig, DependencyRule};
use crate::error::SkillSyncError;

/// Result of running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stderr: String,
}

/// Executes external commands. Swapped out in tests.
pub trait CommandRunner {
    fn run(&self, command: &[String], cwd: Option<&Path>) -> std::io::Result<CommandOutput>;
}

/// Runs commands with [`std::process::Command`], capturing their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &[String], cwd: Option<&Path>) -> std::io::Result<CommandOutput> {
        let (program, args) = command.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command")
        })?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(command = %command.join(" "), "{}", stdout.trim());
        }
        Ok(CommandOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// What the dependency pass did for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DependencyAction {
    ManifestInstalled { manifest: String },
    ToolPresent { tool: String },
    ToolInstalled { tool: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub actions: Vec<DependencyAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl DependencyReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct DependencyManager<'a, R: CommandRunner = SystemRunner> {
    config: &'a DependencyConfig,
    runner: R,
}

impl<'a> DependencyManager<'a, SystemRunner> {
    #[must_use]
    pub const fn new(config: &'a DependencyConfig) -> Self {
        Self {
            config,
            runner: SystemRunner,
        }
    }
}

impl<'a, R: CommandRunner> DependencyManager<'a, R> {
    pub const fn with_runner(config: &'a DependencyConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Install whatever `skill_name` needs. `skill_dir` is the installed copy.
    pub fn install(&self, skill_name: &str, skill_dir: &Path) -> DependencyReport {
        let mut report = DependencyReport::default();
        debug!(skill = skill_name, "checking dependencies");

        let manifest = skill_dir.join(&self.config.manifest);
        if manifest.is_file() {
            info!(skill = skill_name, manifest = %self.config.manifest, "installing manifest");
            match self.exec(&self.config.manifest_install, Some(skill_dir)) {
                Ok(()) => report.actions.push(DependencyAction::ManifestInstalled {
                    manifest: self.config.manifest.clone(),
                }),
                Err(reason) => report.failures.push(failure(skill_name, reason)),
            }
        }

        for rule in self.config.rules.iter().filter(|rule| rule.matches(skill_name)) {
            match self.ensure_tool(rule) {
                Ok(action) => report.actions.push(action),
                Err(reason) => report.failures.push(failure(skill_name, reason)),
            }
        }

        for message in &report.failures {
            warn!(skill = skill_name, "{message}");
        }
        report
    }

    fn ensure_tool(&self, rule: &DependencyRule) -> Result<DependencyAction, String> {
        if self.exec(&rule.probe, None).is_ok() {
            debug!(tool = %rule.tool, "already installed");
            return Ok(DependencyAction::ToolPresent {
                tool: rule.tool.clone(),
            });
        }

        info!(tool = %rule.tool, "installing missing tool");
        self.exec(&rule.install, None)
            .map_err(|reason| format!("install {}: {reason}", rule.tool))?;
        Ok(DependencyAction::ToolInstalled {
            tool: rule.tool.clone(),
        })
    }

    fn exec(&self, command: &[String], cwd: Option<&Path>) -> Result<(), String> {
        let output = self
            .runner
            .run(command, cwd)
            .map_err(|err| format!("`{}` could not be started: {err}", command.join(" ")))?;
        if output.success {
            Ok(())
        } else if output.stderr.is_empty() {
            Err(format!("`{}` failed", command.join(" ")))
        } else {
            Err(format!("`{}` failed: {}", command.join(" "), output.stderr))
        }
    }
}

fn failure(skill: &str, reason: String) -> String {
    SkillSyncError::Dependency {
        skill: skill.to_string(),
        reason,
    }
    .to_string()
}

#[cfg(test)]
pub mod testing {
    //! Scripted command runner for tests.

    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::{CommandOutput, CommandRunner};

    /// Records every command; commands containing a word listed in
    /// `failing` report failure, everything else succeeds.
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        pub failing: Vec<String>,
        pub calls: RefCell<Vec<(Vec<String>, Option<PathBuf>)>>,
    }

    impl RecordingRunner {
        pub fn failing(programs: &[&str]) -> Self {
            Self {
                failing: programs.iter().map(|p| (*p).to_string()).collect(),
                calls: RefCell::default(),
            }
        }

        pub fn commands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(cmd, _)| cmd.join(" ")).collect()
        }
    }

    impl CommandRunner for &RecordingRunner {
        fn run(&self, command: &[String], cwd: Option<&Path>) -> std::io::Result<CommandOutput> {
            self.calls
                .borrow_mut()
                .push((command.to_vec(), cwd.map(Path::to_path_buf)));
            let success = !command.iter().any(|word| self.failing.contains(word));
            Ok(CommandOutput {
                success,
                stderr: if success { String::new() } else { "boom".to_string() },
            })
        }
    }
}
