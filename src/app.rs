use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{GitCli, LocalSnapshot, SnapshotSource};
use crate::locale::{Locale, Messages};

pub struct AppContext {
    pub config_path: PathBuf,
    pub config: Config,
    pub locale: Locale,
    pub source: Box<dyn SnapshotSource>,
    pub robot_mode: bool,
    /// `--yes`: select everything, never prompt for skills.
    pub assume_yes: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = Config::resolve_path(cli.config.as_deref())?;
        let config = Config::load(&config_path)?;

        let source: Box<dyn SnapshotSource> = match &cli.source_dir {
            Some(dir) => Box::new(LocalSnapshot::new(dir)),
            None => Box::new(GitCli::new()),
        };

        Ok(Self {
            config_path,
            config,
            locale: Locale::resolve(cli.lang.as_deref()),
            source,
            robot_mode: cli.robot,
            assume_yes: cli.non_interactive(),
        })
    }

    /// Context over an already loaded configuration.
    #[must_use]
    pub fn new(config_path: PathBuf, config: Config, source: Box<dyn SnapshotSource>) -> Self {
        Self {
            config_path,
            config,
            locale: Locale::En,
            source,
            robot_mode: false,
            assume_yes: false,
        }
    }

    #[must_use]
    pub const fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }
}
