//! Interactive terminal front end for the selection menus.
//!
//! All user-facing text goes through a [`Prompter`], so menus can be
//! driven from scripted input in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::cli::InstallLocation;
use crate::cli::colors::Styles;
use crate::config::Config;
use crate::error::{Result, SkillSyncError};
use crate::locale::{Messages, fill};
use crate::selector::{
    BrowseAction, BrowseMenu, BrowseOutcome, BrowseState, InstallMenu, InstallState, MenuEvent,
    Notice, Selection, parse_line,
};

pub trait Prompter {
    /// Show one line of output.
    fn say(&mut self, text: &str);

    /// Ask for one line of input. `None` means input is closed.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads stdin, writes stdout. In robot mode human text goes to stderr so
/// stdout stays valid JSON.
pub struct StdioPrompter {
    to_stderr: bool,
}

impl StdioPrompter {
    #[must_use]
    pub const fn new(robot_mode: bool) -> Self {
        Self {
            to_stderr: robot_mode,
        }
    }
}

impl Prompter for StdioPrompter {
    fn say(&mut self, text: &str) {
        if self.to_stderr {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Ask where to install (global, project or a custom path).
pub fn choose_location(prompter: &mut dyn Prompter, msgs: &Messages) -> Result<InstallLocation> {
    prompter.say("");
    prompter.say(msgs.location_title);
    prompter.say(&format!("1. {}", msgs.location_global));
    prompter.say(&format!("2. {}", msgs.location_project));
    prompter.say(&format!("3. {}", msgs.location_custom));

    let Some(choice) = prompter.ask(msgs.location_prompt)? else {
        return Err(SkillSyncError::Cancelled);
    };
    match choice.trim() {
        "1" => Ok(InstallLocation::Global),
        "3" => {
            let path = prompter
                .ask(msgs.custom_path_prompt)?
                .ok_or(SkillSyncError::Cancelled)?;
            let path = path.trim();
            if path.is_empty() {
                Ok(InstallLocation::Project)
            } else {
                Ok(InstallLocation::Custom(PathBuf::from(path)))
            }
        }
        "q" | "Q" => Err(SkillSyncError::Cancelled),
        _ => Ok(InstallLocation::Project),
    }
}

/// Run the numbered install menu over the configured skill names.
pub fn select_skills(
    prompter: &mut dyn Prompter,
    names: Vec<String>,
    msgs: &Messages,
) -> Result<Selection> {
    let mut menu = InstallMenu::new(names);
    loop {
        match menu.state().clone() {
            InstallState::ShowList => {
                prompter.say("");
                prompter.say(msgs.available_skills);
                for (idx, name) in menu.items().iter().enumerate() {
                    prompter.say(&format!("{}. {name}", idx + 1));
                }
                prompter.say(&format!("A. {}", msgs.install_all));
                prompter.say(&format!("H. {}", msgs.help_entry));
                menu.list_shown();
            }
            InstallState::AwaitInput => {
                let event = read_event(prompter, msgs.select_prompt, menu.items().len())?;
                menu.handle(event);
            }
            InstallState::Help => {
                prompter.say(msgs.help_text);
                menu.resume();
            }
            InstallState::Reprompt => {
                prompter.say(&Styles::warning(msgs.nothing_selected).to_string());
                menu.resume();
            }
            InstallState::AllSelected => return Ok(Selection::All),
            InstallState::SubsetSelected(names) => {
                prompter.say(&fill(msgs.selected, names.join(", ")));
                return Ok(Selection::Subset(names));
            }
            InstallState::Quit => return Err(SkillSyncError::Cancelled),
        }
    }
}

/// Run the Category -> Skills -> Action browser.
pub fn browse(
    prompter: &mut dyn Prompter,
    mut menu: BrowseMenu,
    config: &Config,
    msgs: &Messages,
) -> Result<BrowseOutcome> {
    loop {
        match menu.state().clone() {
            BrowseState::Categories => {
                prompter.say("");
                prompter.say(&msgs.categories_title.bold().to_string());
                for (idx, category) in menu.categories().iter().enumerate() {
                    let count = menu
                        .records()
                        .iter()
                        .filter(|r| &r.category == category)
                        .count();
                    prompter.say(&format!("{:<4} {category} ({count})", format!("{}.", idx + 1)));
                }
            }
            BrowseState::Skills { categories } => {
                prompter.say("");
                prompter.say(&fill(msgs.skills_title, categories.join(", ")).bold().to_string());
                prompter.say(&format!("{:<4} {:<25} {:<30}", "No.", "Category", "Skill"));
                prompter.say(&"-".repeat(60));
                for (idx, &record_idx) in menu.visible().iter().enumerate() {
                    let record = &menu.records()[record_idx];
                    let mark = if config.contains(&record.name) { "*" } else { " " };
                    prompter.say(&format!(
                        "{:<4} {:<25} {:<30} {mark}",
                        format!("{}.", idx + 1),
                        record.category,
                        record.name
                    ));
                }
                prompter.say(&Styles::muted(msgs.configured_note).to_string());
            }
            BrowseState::Action { skills, .. } => {
                prompter.say("");
                prompter.say(&fill(msgs.action_title, skills.len()));
                prompter.say(&format!("1. {}", msgs.action_install_only));
                prompter.say(&format!("2. {}", msgs.action_persist));
            }
            BrowseState::Done(outcome) => return Ok(outcome),
            BrowseState::Quit => return Err(SkillSyncError::Cancelled),
        }

        let event = read_event(prompter, msgs.browse_prompt, menu.item_count())?;
        menu.handle(event);
        match menu.take_notice() {
            Some(Notice::Help) => {
                prompter.say(msgs.browse_help);
                prompter.say(msgs.help_text);
            }
            Some(Notice::NothingSelected) => {
                prompter.say(&Styles::warning(msgs.nothing_selected).to_string());
            }
            None => {}
        }
    }
}

/// Everything `--yes` picks in browse mode.
#[must_use]
pub fn browse_all(menu: &BrowseMenu) -> BrowseOutcome {
    BrowseOutcome {
        skills: menu.records().to_vec(),
        action: BrowseAction::InstallOnly,
    }
}

fn read_event(prompter: &mut dyn Prompter, prompt: &str, item_count: usize) -> Result<MenuEvent> {
    let Some(line) = prompter.ask(prompt)? else {
        return Ok(MenuEvent::Quit);
    };
    let parsed = parse_line(&line, item_count);
    for warning in &parsed.warnings {
        prompter.say(&format!("{} {warning}", "Warning:".yellow()));
    }
    Ok(parsed.event)
}
