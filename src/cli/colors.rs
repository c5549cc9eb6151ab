//! Terminal colors for skillsync output
//!
//! Status styles plus color support detection that respects `NO_COLOR`,
//! `FORCE_COLOR` and piped output.

use colored::{ColoredString, Colorize};
use std::io::IsTerminal;

/// Level of color support detected for the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    /// No color support (NO_COLOR set, TERM=dumb, piped output)
    None,
    Basic,
}

impl ColorSupport {
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(
            |key| std::env::var(key).ok(),
            std::io::stdout().is_terminal(),
        )
    }

    fn detect_with(lookup: impl Fn(&str) -> Option<String>, is_tty: bool) -> Self {
        // https://no-color.org/
        if lookup("NO_COLOR").is_some() {
            return Self::None;
        }
        if lookup("FORCE_COLOR").is_some() {
            return Self::Basic;
        }
        if !is_tty {
            return Self::None;
        }
        if lookup("TERM").is_some_and(|term| term == "dumb") {
            return Self::None;
        }
        Self::Basic
    }

    #[must_use]
    pub const fn has_color(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Make `colored` follow the detected level for the rest of the process.
    pub fn apply(self) {
        colored::control::set_override(self.has_color());
    }
}

impl Default for ColorSupport {
    fn default() -> Self {
        Self::detect()
    }
}

/// Pre-built styles for status output
pub struct Styles;

impl Styles {
    pub fn success<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().green().bold()
    }

    pub fn error<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().red().bold()
    }

    pub fn warning<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().yellow()
    }

    pub fn info<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().cyan()
    }

    pub fn muted<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().bright_black()
    }

    pub fn check() -> ColoredString {
        "✓".green().bold()
    }

    pub fn cross() -> ColoredString {
        "✗".red().bold()
    }

    pub fn exclaim() -> ColoredString {
        "!".yellow().bold()
    }

    pub fn path<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().underline()
    }
}
