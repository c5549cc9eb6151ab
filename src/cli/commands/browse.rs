//! Browse mode: explore everything the repository ships and optionally
//! remember new picks in the configuration file.

use std::path::Path;

use tracing::{debug, warn};

use crate::app::AppContext;
use crate::cli::colors::Styles;
use crate::cli::output::emit_report;
use crate::cli::prompt::{self, Prompter};
use crate::discovery::discover;
use crate::error::{Result, SkillSyncError};
use crate::locale::fill;
use crate::selector::{BrowseAction, BrowseMenu, BrowseOutcome};
use crate::sync::SyncTarget;

pub fn run(ctx: &mut AppContext, destination: &Path, prompter: &mut dyn Prompter) -> Result<()> {
    if ctx.robot_mode {
        return Err(SkillSyncError::ValidationFailed(
            "--ls is interactive and cannot be combined with --robot".to_string(),
        ));
    }
    let msgs = ctx.messages();

    let snapshot = ctx.source.fetch(ctx.config.repository())?;
    let records = discover(snapshot.root())?;
    debug!(count = records.len(), "discovered skills");
    if records.is_empty() {
        prompter.say(msgs.no_skills_found);
        return Ok(());
    }

    let menu = BrowseMenu::new(records);
    let outcome = if ctx.assume_yes {
        prompt::browse_all(&menu)
    } else {
        prompt::browse(prompter, menu, &ctx.config, msgs)?
    };

    let targets: Vec<SyncTarget> = outcome
        .skills
        .iter()
        .map(|record| SyncTarget::new(&record.name, &record.relative_path))
        .collect();
    let report = super::synchronize(ctx, &snapshot, destination, &targets, prompter)?;

    let mut warnings = Vec::new();
    if outcome.action == BrowseAction::InstallAndPersist {
        if let Some(warning) = persist(ctx, &outcome, &report.succeeded(), prompter) {
            warnings.push(warning);
        }
    }

    emit_report(prompter, &report, ctx.robot_mode, warnings, msgs)?;
    prompter.say(msgs.done);
    Ok(())
}

/// Add installed skills the configuration does not know yet and save it.
/// Returns a warning when the file could not be written.
fn persist(
    ctx: &mut AppContext,
    outcome: &BrowseOutcome,
    installed: &[&str],
    prompter: &mut dyn Prompter,
) -> Option<String> {
    let msgs = ctx.messages();
    let mut added = 0;
    for record in outcome.skills.iter().filter(|r| installed.contains(&r.name.as_str())) {
        if ctx.config.add_skill(&record.name, &record.relative_path) {
            prompter.say(&fill(msgs.added_to_config, &record.name));
            added += 1;
        }
    }
    if added == 0 {
        return None;
    }

    match ctx.config.save(&ctx.config_path) {
        Ok(()) => {
            prompter.say(&Styles::success(fill(msgs.config_saved, ctx.config_path.display())).to_string());
            None
        }
        Err(err) => {
            warn!(path = %ctx.config_path.display(), error = %err, "configuration not saved");
            Some(err.to_string())
        }
    }
}
