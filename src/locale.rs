//! Display language.
//!
//! Resolution order: `--lang`, `SKILLSYNC_LANG`, `LC_ALL`, `LANG`, English.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let lower = tag.trim().to_ascii_lowercase();
        let primary = lower.split(['_', '-', '.']).next().unwrap_or_default();
        match primary {
            "en" | "c" | "posix" => Ok(Self::En),
            "zh" | "cn" => Ok(Self::Zh),
            _ => Err(format!("unsupported language: {tag}")),
        }
    }
}

impl Locale {
    #[must_use]
    pub fn resolve(flag: Option<&str>) -> Self {
        Self::resolve_with(flag, |key| std::env::var(key).ok())
    }

    fn resolve_with(flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(locale) = flag.and_then(|tag| tag.parse().ok()) {
            return locale;
        }
        ["SKILLSYNC_LANG", "LC_ALL", "LANG"]
            .iter()
            .filter_map(|key| lookup(key))
            .filter(|value| !value.trim().is_empty())
            .find_map(|value| value.parse().ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn messages(self) -> &'static Messages {
        match self {
            Self::En => &EN,
            Self::Zh => &ZH,
        }
    }
}

/// User-facing strings. `{}` placeholders are filled with [`fill`].
#[derive(Debug)]
pub struct Messages {
    pub location_title: &'static str,
    pub location_global: &'static str,
    pub location_project: &'static str,
    pub location_custom: &'static str,
    pub location_prompt: &'static str,
    pub custom_path_prompt: &'static str,
    pub location: &'static str,
    pub available_skills: &'static str,
    pub install_all: &'static str,
    pub help_entry: &'static str,
    pub select_prompt: &'static str,
    pub help_text: &'static str,
    pub nothing_selected: &'static str,
    pub selected: &'static str,
    pub categories_title: &'static str,
    pub skills_title: &'static str,
    pub configured_note: &'static str,
    pub action_title: &'static str,
    pub action_install_only: &'static str,
    pub action_persist: &'static str,
    pub browse_prompt: &'static str,
    pub browse_help: &'static str,
    pub no_skills_found: &'static str,
    pub no_installed_skills: &'static str,
    pub found_installed: &'static str,
    pub installing: &'static str,
    pub updating: &'static str,
    pub installed: &'static str,
    pub failed: &'static str,
    pub added_to_config: &'static str,
    pub config_saved: &'static str,
    pub config_not_saved: &'static str,
    pub summary_title: &'static str,
    pub done: &'static str,
}

static EN: Messages = Messages {
    location_title: "Select installation location:",
    location_global: "[Global] VS Code user folder (~/.vscode/skills)",
    location_project: "[Project] Current workspace (./skills)",
    location_custom: "[Custom] Enter a path",
    location_prompt: "Enter choice (1/2/3) [Default: 2]: ",
    custom_path_prompt: "Enter absolute path: ",
    location: "Location: {}",
    available_skills: "Available skills:",
    install_all: "Install all",
    help_entry: "Help",
    select_prompt: "Enter numbers separated by spaces (e.g. '1 2'), 'A' for all or 'Q' to quit [Default: A]: ",
    help_text: "Options:\n  <numbers> : select skills by index, separated by spaces ('1 3' picks the first and third)\n  A         : select everything (default)\n  B         : go back one step (browse only)\n  H         : show this help\n  Q         : quit",
    nothing_selected: "No valid skills selected.",
    selected: "Selected: {}",
    categories_title: "Categories:",
    skills_title: "Skills in {}:",
    configured_note: "(* = already in configuration)",
    action_title: "What should happen with {} skill(s)?",
    action_install_only: "Install only",
    action_persist: "Install and add to configuration",
    browse_prompt: "Selection ('A' all, 'B' back, 'H' help, 'Q' quit): ",
    browse_help: "Pick categories first, then skills, then the action.",
    no_skills_found: "No skills found in the remote repository (expected plugins/*/skills/*).",
    no_installed_skills: "No known skills found in this location to update.",
    found_installed: "Found skills: {}",
    installing: "Installing {}...",
    updating: "Updating {}...",
    installed: "Installed {}",
    failed: "Failed {}",
    added_to_config: "Added '{}' to configuration.",
    config_saved: "Configuration saved to {}.",
    config_not_saved: "Warning: {}",
    summary_title: "Summary",
    done: "Done.",
};

static ZH: Messages = Messages {
    location_title: "选择安装位置：",
    location_global: "[全局] VS Code 用户目录 (~/.vscode/skills)",
    location_project: "[项目] 当前工作区 (./skills)",
    location_custom: "[自定义] 输入路径",
    location_prompt: "请输入选项 (1/2/3) [默认: 2]：",
    custom_path_prompt: "请输入绝对路径：",
    location: "位置：{}",
    available_skills: "可用技能：",
    install_all: "全部安装",
    help_entry: "帮助",
    select_prompt: "输入以空格分隔的编号（如 '1 2'），'A' 全选，'Q' 退出 [默认: A]：",
    help_text: "选项：\n  <编号> : 按编号选择技能，以空格分隔（'1 3' 选择第一和第三项）\n  A      : 全部选择（默认）\n  B      : 返回上一步（仅浏览模式）\n  H      : 显示帮助\n  Q      : 退出",
    nothing_selected: "没有选择任何有效技能。",
    selected: "已选择：{}",
    categories_title: "分类：",
    skills_title: "{} 中的技能：",
    configured_note: "(* = 已在配置中)",
    action_title: "如何处理这 {} 个技能？",
    action_install_only: "仅安装",
    action_persist: "安装并加入配置",
    browse_prompt: "请选择（'A' 全部，'B' 返回，'H' 帮助，'Q' 退出）：",
    browse_help: "先选择分类，再选择技能，最后选择操作。",
    no_skills_found: "远程仓库中没有找到技能（应位于 plugins/*/skills/*）。",
    no_installed_skills: "此位置没有可更新的已知技能。",
    found_installed: "发现技能：{}",
    installing: "正在安装 {}...",
    updating: "正在更新 {}...",
    installed: "已安装 {}",
    failed: "失败 {}",
    added_to_config: "已将 '{}' 加入配置。",
    config_saved: "配置已保存到 {}。",
    config_not_saved: "警告：{}",
    summary_title: "汇总",
    done: "完成。",
};

/// Replace the first `{}` in `template` with `value`.
#[must_use]
pub fn fill(template: &str, value: impl std::fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let locale = Locale::resolve_with(Some("zh"), |_| Some("en_US.UTF-8".to_string()));
        assert_eq!(locale, Locale::Zh);
    }

    #[test]
    fn environment_order_is_respected() {
        let locale = Locale::resolve_with(None, |key| match key {
            "LC_ALL" => Some("zh_CN.UTF-8".to_string()),
            "LANG" => Some("en_US.UTF-8".to_string()),
            _ => None,
        });
        assert_eq!(locale, Locale::Zh);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let locale = Locale::resolve_with(Some("klingon"), |key| {
            (key == "LANG").then(|| "fr_FR.UTF-8".to_string())
        });
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn fill_replaces_placeholder() {
        assert_eq!(fill(EN.installing, "alpha"), "Installing alpha...");
        assert_eq!(fill(ZH.added_to_config, "beta"), "已将 'beta' 加入配置。");
    }
}
