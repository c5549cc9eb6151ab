//! Install mode: pick configured skills from a numbered list and install them.

use std::path::Path;

use tracing::info;

use crate::app::AppContext;
use crate::cli::output::emit_report;
use crate::cli::prompt::{self, Prompter};
use crate::error::Result;
use crate::selector::Selection;
use crate::sync::{all_targets, resolve_targets};

pub fn run(ctx: &AppContext, destination: &Path, prompter: &mut dyn Prompter) -> Result<()> {
    let msgs = ctx.messages();

    let selection = if ctx.assume_yes {
        Selection::All
    } else {
        let names = ctx.config.skills.keys().cloned().collect();
        prompt::select_skills(prompter, names, msgs)?
    };

    let targets = match &selection {
        Selection::All => all_targets(&ctx.config),
        Selection::Subset(names) => resolve_targets(&ctx.config, names),
    };
    info!(count = targets.len(), "installing skills");

    let snapshot = ctx.source.fetch(ctx.config.repository())?;
    let report = super::synchronize(ctx, &snapshot, destination, &targets, prompter)?;
    emit_report(prompter, &report, ctx.robot_mode, Vec::new(), msgs)?;
    prompter.say(msgs.done);
    Ok(())
}
