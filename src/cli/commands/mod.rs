//! CLI mode implementations
//!
//! Each mode has its own module with a `run()` function. They share the
//! destination resolution and the synchronization pass defined here.

use std::path::{Path, PathBuf};

pub mod browse;
pub mod install;
pub mod upgrade;

use crate::app::AppContext;
use crate::cli::colors::Styles;
use crate::cli::prompt::{self, Prompter};
use crate::cli::{Cli, Mode};
use crate::deps::DependencyManager;
use crate::error::Result;
use crate::fetch::Snapshot;
use crate::locale::fill;
use crate::sync::{SkillStatus, SyncEvent, SyncReport, SyncTarget, Synchronizer};

/// Dispatch to the mode selected on the command line.
pub fn run(ctx: &mut AppContext, cli: &Cli, prompter: &mut dyn Prompter) -> Result<()> {
    let destination = resolve_destination(ctx, cli, prompter)?;
    prompter.say(&fill(ctx.messages().location, destination.display()));

    match cli.mode() {
        Mode::Install => install::run(ctx, &destination, prompter),
        Mode::Browse => browse::run(ctx, &destination, prompter),
        Mode::Upgrade => upgrade::run(ctx, &destination, prompter),
    }
}

fn resolve_destination(ctx: &AppContext, cli: &Cli, prompter: &mut dyn Prompter) -> Result<PathBuf> {
    let location = match cli.location() {
        Some(location) => location,
        None if ctx.assume_yes => crate::cli::InstallLocation::Project,
        None => prompt::choose_location(prompter, ctx.messages())?,
    };
    location.path()
}

/// Copy `targets` from `snapshot` into `destination`, printing progress.
pub fn synchronize(
    ctx: &AppContext,
    snapshot: &Snapshot,
    destination: &Path,
    targets: &[SyncTarget],
    prompter: &mut dyn Prompter,
) -> Result<SyncReport> {
    let msgs = ctx.messages();
    let deps = DependencyManager::new(&ctx.config.dependencies);
    let synchronizer = Synchronizer::new(destination, deps);

    synchronizer.run(snapshot, targets, |event| match event {
        SyncEvent::Started { name, replacing } => {
            let template = if replacing { msgs.updating } else { msgs.installing };
            prompter.say(&Styles::info(fill(template, name)).to_string());
        }
        SyncEvent::Finished(outcome) => {
            match &outcome.status {
                SkillStatus::Failed { reason } => {
                    prompter.say(&format!("{} {}", Styles::cross(), Styles::error(reason)));
                }
                SkillStatus::Installed | SkillStatus::Updated => {
                    prompter.say(&format!(
                        "{} {}",
                        Styles::check(),
                        fill(msgs.installed, Styles::path(outcome.destination.display().to_string()))
                    ));
                }
            }
            for warning in outcome.dependency_failures() {
                prompter.say(&format!("  {} {}", Styles::exclaim(), Styles::warning(warning)));
            }
        }
    })
}
