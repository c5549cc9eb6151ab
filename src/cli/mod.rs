//! Command line interface

use std::path::PathBuf;

use clap::{ArgGroup, ArgAction, Parser};

use crate::error::{Result, SkillSyncError};

pub mod colors;
pub mod commands;
pub mod output;
pub mod prompt;

const EXAMPLES: &str = "\
Interactive mode:
  Run without arguments to be asked for an installation location and the skills to install.

Examples:
  skillsync --global-install --yes     Install every configured skill to ~/.vscode/skills
  skillsync --project-install          Install to ./skills, choosing skills interactively
  skillsync --check-updates --target ./skills
                                       Refresh the skills already installed in ./skills
  skillsync --ls                       Browse the remote repository for new skills";

#[derive(Parser, Debug)]
#[command(
    name = "skillsync",
    version,
    about = "Install, update and discover agent skills from a remote repository",
    after_help = EXAMPLES,
    group(
        ArgGroup::new("location")
            .args(["global_install", "project_install", "app_install", "target"])
            .multiple(false)
    )
)]
pub struct Cli {
    /// Install to the global VS Code folder (~/.vscode/skills)
    #[arg(long)]
    pub global_install: bool,

    /// Install to the current project (./skills)
    #[arg(long)]
    pub project_install: bool,

    /// Install to the VS Code application data folder
    #[arg(long)]
    pub app_install: bool,

    /// Install to a custom directory
    #[arg(long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Update skills already installed in the target location
    #[arg(long, conflicts_with = "ls")]
    pub check_updates: bool,

    /// Browse skills available in the remote repository
    #[arg(long)]
    pub ls: bool,

    /// Skip interactive selection and install everything
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Display language (en, zh)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Path to the skills configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use a local checkout instead of cloning the repository
    #[arg(long, value_name = "DIR", hide = true)]
    pub source_dir: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Install,
    Browse,
    Upgrade,
}

impl Cli {
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.ls {
            Mode::Browse
        } else if self.check_updates {
            Mode::Upgrade
        } else {
            Mode::Install
        }
    }

    /// Location picked by flags, if any.
    #[must_use]
    pub fn location(&self) -> Option<InstallLocation> {
        if self.global_install {
            Some(InstallLocation::Global)
        } else if self.project_install {
            Some(InstallLocation::Project)
        } else if self.app_install {
            Some(InstallLocation::App)
        } else {
            self.target.clone().map(InstallLocation::Custom)
        }
    }

    /// Never prompt: `--yes` or `--robot`.
    #[must_use]
    pub const fn non_interactive(&self) -> bool {
        self.yes || self.robot
    }
}

/// Where skills are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallLocation {
    /// `~/.vscode/skills`
    Global,
    /// `./skills`
    Project,
    /// VS Code user data: `<config dir>/Code/User/skills`
    App,
    Custom(PathBuf),
}

impl InstallLocation {
    pub fn path(&self) -> Result<PathBuf> {
        match self {
            Self::Global => dirs::home_dir()
                .map(|home| home.join(".vscode").join("skills"))
                .ok_or_else(|| SkillSyncError::Config("home directory not found".to_string())),
            Self::Project => Ok(std::env::current_dir()?.join("skills")),
            Self::App => dirs::config_dir()
                .map(|dir| dir.join("Code").join("User").join("skills"))
                .ok_or_else(|| SkillSyncError::Config("config directory not found".to_string())),
            Self::Custom(path) => Ok(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn default_mode_is_install() {
        let cli = Cli::parse_from(["skillsync"]);
        assert_eq!(cli.mode(), Mode::Install);
        assert_eq!(cli.location(), None);
        assert!(!cli.non_interactive());
    }

    #[test]
    fn browse_and_upgrade_modes() {
        assert_eq!(Cli::parse_from(["skillsync", "--ls"]).mode(), Mode::Browse);
        assert_eq!(
            Cli::parse_from(["skillsync", "--check-updates"]).mode(),
            Mode::Upgrade
        );
    }

    #[test]
    fn location_flags_are_exclusive() {
        let result = Cli::try_parse_from(["skillsync", "--global-install", "--project-install"]);
        assert!(result.is_err());
        let result = Cli::try_parse_from(["skillsync", "--ls", "--check-updates"]);
        assert!(result.is_err());
    }

    #[test]
    fn target_is_custom_location() {
        let cli = Cli::parse_from(["skillsync", "--target", "/tmp/skills", "-y"]);
        assert_eq!(
            cli.location(),
            Some(InstallLocation::Custom(PathBuf::from("/tmp/skills")))
        );
        assert!(cli.non_interactive());
        assert_eq!(
            cli.location().unwrap().path().unwrap(),
            PathBuf::from("/tmp/skills")
        );
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["skillsync", "-vv", "--lang", "zh"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.lang.as_deref(), Some("zh"));
    }

    #[test]
    fn project_location_is_under_cwd() {
        let path = InstallLocation::Project.path().unwrap();
        assert_eq!(path, std::env::current_dir().unwrap().join("skills"));
    }
}
