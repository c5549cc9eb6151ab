//! Skill selection menus.
//!
//! Both menus are plain state machines fed with [`MenuEvent`]s. The
//! terminal front end in `cli::prompt` renders the current state, reads a
//! line, turns it into an event with [`parse_line`] and hands it back.
//!
//! Install menu:
//!
//! ```text
//! ShowList -> AwaitInput -> Help | Reprompt   (both resume to ShowList)
//!                        -> AllSelected | SubsetSelected | Quit
//! ```
//!
//! Browse menu: `Categories -> Skills -> Action -> Done`, with `Quit`
//! reachable from every step and `Back` stepping one level up.

use std::fmt;

use crate::discovery::{self, SkillRecord};

/// One line of user input, already interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// Empty line or the "all" sentinel.
    All,
    Help,
    Quit,
    Back,
    /// Valid zero-based indices, de-duplicated in input order. May be empty.
    Select(Vec<usize>),
}

/// A token of a selection line that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenWarning {
    NotANumber(String),
    OutOfRange(String),
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber(token) => write!(f, "'{token}' is not a number"),
            Self::OutOfRange(token) => write!(f, "number '{token}' is out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub event: MenuEvent,
    pub warnings: Vec<TokenWarning>,
}

/// Interpret a line typed at a menu listing `item_count` entries (numbered from 1).
#[must_use]
pub fn parse_line(line: &str, item_count: usize) -> ParsedLine {
    let trimmed = line.trim();
    let keyword = match trimmed.to_ascii_lowercase().as_str() {
        "" | "a" | "all" => Some(MenuEvent::All),
        "h" | "help" | "?" => Some(MenuEvent::Help),
        "q" | "quit" => Some(MenuEvent::Quit),
        "b" | "back" => Some(MenuEvent::Back),
        _ => None,
    };
    if let Some(event) = keyword {
        return ParsedLine {
            event,
            warnings: Vec::new(),
        };
    }

    let mut picked = Vec::new();
    let mut warnings = Vec::new();
    for token in trimmed.split_whitespace() {
        match token.parse::<usize>() {
            Ok(n) if (1..=item_count).contains(&n) => {
                if !picked.contains(&(n - 1)) {
                    picked.push(n - 1);
                }
            }
            Ok(_) => warnings.push(TokenWarning::OutOfRange(token.to_string())),
            Err(_) => warnings.push(TokenWarning::NotANumber(token.to_string())),
        }
    }

    ParsedLine {
        event: MenuEvent::Select(picked),
        warnings,
    }
}

// ============================================================================
// Install menu
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    ShowList,
    AwaitInput,
    Help,
    Reprompt,
    /// Every configured skill.
    AllSelected,
    SubsetSelected(Vec<String>),
    Quit,
}

/// Resolved choice of an install menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Subset(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct InstallMenu {
    items: Vec<String>,
    state: InstallState,
}

impl InstallMenu {
    #[must_use]
    pub const fn new(items: Vec<String>) -> Self {
        Self {
            items,
            state: InstallState::ShowList,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub const fn state(&self) -> &InstallState {
        &self.state
    }

    /// The list has been rendered; wait for input.
    pub fn list_shown(&mut self) {
        if self.state == InstallState::ShowList {
            self.state = InstallState::AwaitInput;
        }
    }

    /// Help or the reprompt notice has been rendered; show the list again.
    pub fn resume(&mut self) {
        if matches!(self.state, InstallState::Help | InstallState::Reprompt) {
            self.state = InstallState::ShowList;
        }
    }

    pub fn handle(&mut self, event: MenuEvent) -> &InstallState {
        if self.state != InstallState::AwaitInput {
            return &self.state;
        }
        self.state = match event {
            MenuEvent::All => InstallState::AllSelected,
            MenuEvent::Help => InstallState::Help,
            MenuEvent::Quit => InstallState::Quit,
            MenuEvent::Back => InstallState::Reprompt,
            MenuEvent::Select(indices) => {
                let names: Vec<String> = indices
                    .iter()
                    .filter_map(|&i| self.items.get(i).cloned())
                    .collect();
                if names.is_empty() {
                    InstallState::Reprompt
                } else {
                    InstallState::SubsetSelected(names)
                }
            }
        };
        &self.state
    }

    /// `Some(Ok(..))` once a selection is made, `Some(Err(()))` on quit.
    #[must_use]
    pub fn outcome(&self) -> Option<Result<Selection, ()>> {
        match &self.state {
            InstallState::AllSelected => Some(Ok(Selection::All)),
            InstallState::SubsetSelected(names) => Some(Ok(Selection::Subset(names.clone()))),
            InstallState::Quit => Some(Err(())),
            _ => None,
        }
    }
}

// ============================================================================
// Browse menu
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    InstallOnly,
    /// Also add new skills to the configuration file.
    InstallAndPersist,
}

impl BrowseAction {
    pub const ALL: [Self; 2] = [Self::InstallOnly, Self::InstallAndPersist];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOutcome {
    pub skills: Vec<SkillRecord>,
    pub action: BrowseAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseState {
    Categories,
    /// Choosing skills within the named categories.
    Skills { categories: Vec<String> },
    /// Choosing what to do with the picked skills (indices into `records`).
    Action {
        categories: Vec<String>,
        skills: Vec<usize>,
    },
    Done(BrowseOutcome),
    Quit,
}

/// Side note for the renderer about the last event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Help,
    NothingSelected,
}

#[derive(Debug, Clone)]
pub struct BrowseMenu {
    records: Vec<SkillRecord>,
    categories: Vec<String>,
    state: BrowseState,
    notice: Option<Notice>,
}

impl BrowseMenu {
    /// Records are sorted by `(category, name)` before numbering.
    #[must_use]
    pub fn new(mut records: Vec<SkillRecord>) -> Self {
        discovery::sort_for_display(&mut records);
        let categories = discovery::categories(&records);
        Self {
            records,
            categories,
            state: BrowseState::Categories,
            notice: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &BrowseState {
        &self.state
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn records(&self) -> &[SkillRecord] {
        &self.records
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Numbered entries of the current step: record indices in the skills
    /// step, empty otherwise.
    #[must_use]
    pub fn visible(&self) -> Vec<usize> {
        match &self.state {
            BrowseState::Skills { categories } => self.in_categories(categories),
            _ => Vec::new(),
        }
    }

    /// Number of selectable entries in the current step.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match &self.state {
            BrowseState::Categories => self.categories.len(),
            BrowseState::Skills { categories } => self.in_categories(categories).len(),
            BrowseState::Action { .. } => BrowseAction::ALL.len(),
            BrowseState::Done(_) | BrowseState::Quit => 0,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, BrowseState::Done(_) | BrowseState::Quit)
    }

    pub fn handle(&mut self, event: MenuEvent) -> &BrowseState {
        self.notice = None;
        if event == MenuEvent::Quit {
            if !self.is_finished() {
                self.state = BrowseState::Quit;
            }
            return &self.state;
        }
        if event == MenuEvent::Help {
            self.notice = Some(Notice::Help);
            return &self.state;
        }

        let next = match (&self.state, event) {
            (BrowseState::Categories, MenuEvent::All) => Some(BrowseState::Skills {
                categories: self.categories.clone(),
            }),
            (BrowseState::Categories, MenuEvent::Select(picked)) => {
                let categories: Vec<String> = picked
                    .iter()
                    .filter_map(|&i| self.categories.get(i).cloned())
                    .collect();
                (!categories.is_empty()).then_some(BrowseState::Skills { categories })
            }
            (BrowseState::Skills { .. }, MenuEvent::Back) => Some(BrowseState::Categories),
            (BrowseState::Skills { categories }, MenuEvent::All) => Some(BrowseState::Action {
                categories: categories.clone(),
                skills: self.in_categories(categories),
            }),
            (BrowseState::Skills { categories }, MenuEvent::Select(picked)) => {
                let visible = self.in_categories(categories);
                let skills: Vec<usize> = picked.iter().filter_map(|&i| visible.get(i).copied()).collect();
                (!skills.is_empty()).then(|| BrowseState::Action {
                    categories: categories.clone(),
                    skills,
                })
            }
            (BrowseState::Action { categories, .. }, MenuEvent::Back) => Some(BrowseState::Skills {
                categories: categories.clone(),
            }),
            (BrowseState::Action { skills, .. }, MenuEvent::All) => {
                Some(self.done(skills, BrowseAction::InstallOnly))
            }
            (BrowseState::Action { skills, .. }, MenuEvent::Select(picked)) => picked
                .first()
                .and_then(|&i| BrowseAction::ALL.get(i))
                .map(|&action| self.done(skills, action)),
            _ => None,
        };

        match next {
            Some(state) => self.state = state,
            None if !self.is_finished() => self.notice = Some(Notice::NothingSelected),
            None => {}
        }
        &self.state
    }

    fn in_categories(&self, categories: &[String]) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| categories.contains(&r.category))
            .map(|(i, _)| i)
            .collect()
    }

    fn done(&self, skills: &[usize], action: BrowseAction) -> BrowseState {
        BrowseState::Done(BrowseOutcome {
            skills: skills.iter().map(|&i| self.records[i].clone()).collect(),
            action,
        })
    }
}
