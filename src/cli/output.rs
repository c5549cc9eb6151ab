use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::cli::colors::Styles;
use crate::cli::prompt::Prompter;
use crate::error::{Result, SkillSyncError};
use crate::locale::{Messages, fill};
use crate::sync::{SkillStatus, SyncReport};

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
    Partial { completed: usize, failed: usize },
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

/// Robot envelope for a finished pass; per-skill failures make it partial.
pub fn robot_report(report: &SyncReport, warnings: Vec<String>) -> RobotResponse<&SyncReport> {
    let failed = report.failed().len();
    let status = if failed == 0 {
        RobotStatus::Ok
    } else {
        RobotStatus::Partial {
            completed: report.skills.len() - failed,
            failed,
        }
    };
    let mut warnings = warnings;
    warnings.extend(
        report
            .skills
            .iter()
            .flat_map(|s| s.dependency_failures().iter().cloned()),
    );
    RobotResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: report,
        warnings,
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| SkillSyncError::Config(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.chars().count().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(key).dim().to_string();
        self.lines.push(format!(
            "{key_style:width$} {value}",
            width = self.key_width
        ));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Summary printed after a pass in human mode.
#[must_use]
pub fn report_layout(report: &SyncReport, msgs: &Messages) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .blank()
        .section(msgs.summary_title)
        .kv("Location", &report.destination.display().to_string())
        .kv("Succeeded", &report.succeeded().len().to_string())
        .kv("Failed", &report.failed().len().to_string());

    for skill in &report.skills {
        if let SkillStatus::Failed { reason } = &skill.status {
            layout.bullet(&format!("{} {reason}", Styles::cross()));
        }
        for warning in skill.dependency_failures() {
            layout.bullet(&format!("{} {warning}", Styles::exclaim()));
        }
    }
    layout
}

/// Print the report for humans or as JSON.
pub fn emit_report(
    prompter: &mut dyn Prompter,
    report: &SyncReport,
    robot_mode: bool,
    warnings: Vec<String>,
    msgs: &Messages,
) -> Result<()> {
    if robot_mode {
        return emit_json(&robot_report(report, warnings));
    }
    for warning in &warnings {
        prompter.say(&fill(msgs.config_not_saved, Styles::warning(warning)));
    }
    prompter.say(&report_layout(report, msgs).build());
    Ok(())
}
