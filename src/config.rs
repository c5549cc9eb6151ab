use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, SkillSyncError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "skills.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(alias = "repo_url")]
    pub repository_url: String,
    /// Skill name to its path relative to the repository root.
    #[serde(default)]
    pub skills: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "DependencyConfig::is_default")]
    pub dependencies: DependencyConfig,
    /// Set from `SKILLSYNC_REPO_URL`; never written back.
    #[serde(skip)]
    repository_override: Option<String>,
}

impl Config {
    #[must_use]
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            skills: BTreeMap::new(),
            dependencies: DependencyConfig::default(),
            repository_override: None,
        }
    }

    /// Resolve the configuration path: explicit flag, `SKILLSYNC_CONFIG`,
    /// `./skills.json`, then the user config directory.
    pub fn resolve_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = env_string("SKILLSYNC_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let local = std::env::current_dir()?.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(local);
        }

        let global = dirs::config_dir()
            .ok_or_else(|| SkillSyncError::MissingConfig("config directory not found".to_string()))?
            .join("skillsync")
            .join(CONFIG_FILE_NAME);
        Ok(global)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SkillSyncError::MissingConfig(format!(
                "{} not found",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SkillSyncError::Config(format!("read config {}: {err}", path.display())))?;
        let mut config: Self = serde_json::from_str(&raw)
            .map_err(|err| SkillSyncError::Config(format!("parse config {}: {err}", path.display())))?;

        config.apply_env_overrides();
        config.validate()?;
        debug!(path = %path.display(), skills = config.skills.len(), "loaded configuration");
        Ok(config)
    }

    /// Write the configuration back. The file is replaced atomically so a
    /// failed write never leaves a truncated store behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let persist_err = |what: &str, err: &dyn std::fmt::Display| {
            SkillSyncError::ConfigPersist(format!("{what} {}: {err}", path.display()))
        };

        let mut payload = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut payload, formatter);
        self.serialize(&mut serializer)
            .map_err(|err| persist_err("serialize", &err))?;
        payload.push(b'\n');

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|err| persist_err("create parent of", &err))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|err| persist_err("stage", &err))?;
        tmp.write_all(&payload)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| persist_err("write", &err))?;
        tmp.persist(path)
            .map_err(|err| persist_err("replace", &err.error))?;

        debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Repository to clone, honoring `SKILLSYNC_REPO_URL`.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.repository_override
            .as_deref()
            .unwrap_or(&self.repository_url)
    }

    /// Register a skill. Returns `false` when the name is already known.
    pub fn add_skill(&mut self, name: impl Into<String>, relative_path: impl Into<String>) -> bool {
        let name = name.into();
        if self.skills.contains_key(&name) {
            return false;
        }
        self.skills.insert(name, relative_path.into());
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    fn validate(&self) -> Result<()> {
        if self.repository().trim().is_empty() {
            return Err(SkillSyncError::Config(
                "repository_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(env_string);
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SKILLSYNC_REPO_URL") {
            self.repository_override = Some(url);
        }
    }
}

/// How skill dependencies are installed after a copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyConfig {
    /// Manifest file looked up in each installed skill directory.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Command run in the skill directory when the manifest exists.
    #[serde(default = "default_manifest_install")]
    pub manifest_install: Vec<String>,
    #[serde(default = "default_rules")]
    pub rules: Vec<DependencyRule>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            manifest_install: default_manifest_install(),
            rules: default_rules(),
        }
    }
}

impl DependencyConfig {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A named tool some skills expect on `PATH`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyRule {
    /// Matched as a substring of the skill name.
    pub pattern: String,
    pub tool: String,
    pub probe: Vec<String>,
    pub install: Vec<String>,
}

impl DependencyRule {
    #[must_use]
    pub fn matches(&self, skill_name: &str) -> bool {
        skill_name.contains(&self.pattern)
    }
}

fn python() -> String {
    if cfg!(windows) { "python" } else { "python3" }.to_string()
}

fn pip_install(args: &[&str]) -> Vec<String> {
    let mut cmd = vec![python(), "-m".to_string(), "pip".to_string(), "install".to_string()];
    cmd.extend(args.iter().map(|arg| (*arg).to_string()));
    cmd
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_manifest_install() -> Vec<String> {
    pip_install(&["-r", "requirements.txt"])
}

fn default_rules() -> Vec<DependencyRule> {
    vec![
        DependencyRule {
            pattern: "dbt-transformation-patterns".to_string(),
            tool: "dbt".to_string(),
            probe: vec!["dbt".to_string(), "--version".to_string()],
            install: pip_install(&["dbt-core"]),
        },
        DependencyRule {
            pattern: "sql-optimization-patterns".to_string(),
            tool: "sqlfluff".to_string(),
            probe: vec!["sqlfluff".to_string(), "--version".to_string()],
            install: pip_install(&["sqlfluff"]),
        },
    ]
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_accepts_legacy_repo_url_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(
            &path,
            r#"{"repo_url": "https://example.com/skills.git",
                "skills": {"alpha": "plugins/a/skills/alpha"}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.repository_url, "https://example.com/skills.git");
        assert_eq!(config.skills["alpha"], "plugins/a/skills/alpha");
        assert_eq!(config.dependencies, DependencyConfig::default());
    }

    #[test]
    fn load_missing_file_is_missing_config() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SkillSyncError::MissingConfig(_)));
    }

    #[test]
    fn load_rejects_empty_repository() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.json");
        std::fs::write(&path, r#"{"repository_url": "  ", "skills": {}}"#).unwrap();
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            SkillSyncError::Config(_)
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.json");
        let mut config = Config::new("https://example.com/skills.git");
        assert!(config.add_skill("beta", "plugins/b/skills/beta"));
        assert!(!config.add_skill("beta", "elsewhere"));
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded, config);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    \"repository_url\""));
        assert!(!raw.contains("dependencies"));
    }

    #[test]
    fn save_leaves_no_staging_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.json");
        Config::new("https://example.com/skills.git").save(&path).unwrap();
        Config::new("https://example.com/other.git").save(&path).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn repository_override_is_not_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.json");
        let mut config = Config::new("https://example.com/skills.git");
        config.apply_overrides(|key| {
            (key == "SKILLSYNC_REPO_URL").then(|| "/tmp/mirror".to_string())
        });
        assert_eq!(config.repository(), "/tmp/mirror");

        config.save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("/tmp/mirror"));
    }

    #[test]
    fn default_rules_match_by_substring() {
        let rules = default_rules();
        assert!(rules[0].matches("dbt-transformation-patterns"));
        assert!(rules[1].matches("my-sql-optimization-patterns-v2"));
        assert!(!rules[1].matches("sql-basics"));
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "repository_url": "u",
                "dependencies": {
                    "rules": [{"pattern": "lint", "tool": "ruff",
                               "probe": ["ruff", "--version"],
                               "install": ["pipx", "install", "ruff"]}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.dependencies.rules.len(), 1);
        assert_eq!(config.dependencies.manifest, "requirements.txt");
        assert_eq!(config.dependencies.rules[0].tool, "ruff");
    }
}
