//! Skill discovery inside a snapshot.
//!
//! Skills live at `plugins/<category>/skills/<name>`. Anything else in the
//! repository is ignored.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;

const PLUGINS_DIR: &str = "plugins";
const SKILLS_DIR: &str = "skills";

/// A skill found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRecord {
    pub name: String,
    /// Path relative to the snapshot root, `/`-separated.
    pub relative_path: String,
    pub category: String,
}

/// Enumerate every skill in the snapshot. Order is unspecified; call
/// [`sort_for_display`] before showing the list.
pub fn discover(root: &Path) -> Result<Vec<SkillRecord>> {
    let plugins = root.join(PLUGINS_DIR);
    let mut found = Vec::new();
    if !plugins.is_dir() {
        debug!(path = %plugins.display(), "no plugins directory in snapshot");
        return Ok(found);
    }

    for category in std::fs::read_dir(&plugins)? {
        let category = category?;
        if !category.file_type()?.is_dir() {
            continue;
        }
        let skills_dir = category.path().join(SKILLS_DIR);
        if !skills_dir.is_dir() {
            continue;
        }
        let Some(category_name) = category.file_name().to_str().map(str::to_string) else {
            continue;
        };

        for skill in std::fs::read_dir(&skills_dir)? {
            let skill = skill?;
            if !skill.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = skill.file_name().to_str().map(str::to_string) else {
                continue;
            };
            found.push(SkillRecord {
                relative_path: format!("{PLUGINS_DIR}/{category_name}/{SKILLS_DIR}/{name}"),
                category: category_name.clone(),
                name,
            });
        }
    }

    debug!(count = found.len(), "discovered skills");
    Ok(found)
}

/// Stable sort by `(category, name)`, case-sensitive.
pub fn sort_for_display(records: &mut [SkillRecord]) {
    records.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn categories(records: &[SkillRecord]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for record in records {
        if !out.contains(&record.category) {
            out.push(record.category.clone());
        }
    }
    out
}
