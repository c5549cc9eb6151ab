//! Upgrade mode: refresh the configured skills already present in the destination.

use std::path::Path;

use crate::app::AppContext;
use crate::cli::output::emit_report;
use crate::cli::prompt::Prompter;
use crate::error::Result;
use crate::locale::fill;
use crate::sync::resolve_targets;

pub fn run(ctx: &AppContext, destination: &Path, prompter: &mut dyn Prompter) -> Result<()> {
    let msgs = ctx.messages();
    let installed = installed_skills(ctx, destination)?;

    if installed.is_empty() {
        prompter.say(msgs.no_installed_skills);
        return Ok(());
    }
    prompter.say(&fill(msgs.found_installed, installed.join(", ")));

    let targets = resolve_targets(&ctx.config, &installed);
    let snapshot = ctx.source.fetch(ctx.config.repository())?;
    let report = super::synchronize(ctx, &snapshot, destination, &targets, prompter)?;
    emit_report(prompter, &report, ctx.robot_mode, Vec::new(), msgs)?;
    prompter.say(msgs.done);
    Ok(())
}

/// Directories in `destination` named after a configured skill, sorted.
fn installed_skills(ctx: &AppContext, destination: &Path) -> Result<Vec<String>> {
    if !destination.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(destination)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if ctx.config.contains(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
