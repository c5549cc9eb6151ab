use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A checkout with two configured skills and one extra, plus a config file.
fn workspace(repository_url: &str) -> TempDir {
    let dir = tempdir().unwrap();
    let repo = dir.path().join("repo");
    write(&repo.join("plugins/data/skills/etl/SKILL.md"), "# etl\n");
    write(&repo.join("plugins/data/skills/etl/scripts/run.py"), "print('etl')\n");
    write(&repo.join("plugins/web/skills/react/SKILL.md"), "# react\n");
    write(&repo.join("plugins/web/skills/vue/SKILL.md"), "# vue\n");

    let config = serde_json::json!({
        "repository_url": repository_url,
        "skills": {
            "etl": "plugins/data/skills/etl",
            "react": "plugins/web/skills/react"
        }
    });
    write(
        &dir.path().join("skills.json"),
        &serde_json::to_string_pretty(&config).unwrap(),
    );
    dir
}

fn skillsync(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skillsync").unwrap();
    cmd.current_dir(dir)
        .env_remove("SKILLSYNC_CONFIG")
        .env_remove("SKILLSYNC_REPO_URL")
        .env("SKILLSYNC_LANG", "en")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.join("skills.json"));
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("skillsync").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--check-updates"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("skillsync").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_conflicting_locations_rejected() {
    let mut cmd = Command::cargo_bin("skillsync").unwrap();
    cmd.args(["--global-install", "--project-install"])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("skillsync").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SKILLSYNC_CONFIG")
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .args(["--project-install", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn test_install_all_from_local_checkout() {
    let dir = workspace("https://example.invalid/skills.git");
    let target = dir.path().join("out");

    skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("repo"))
        .arg("--target")
        .arg(&target)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done."));

    assert!(target.join("etl/scripts/run.py").exists());
    assert!(target.join("react/SKILL.md").exists());
    assert!(!target.join("vue").exists());
}

#[test]
fn test_interactive_quit_exits_130() {
    let dir = workspace("https://example.invalid/skills.git");

    skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("repo"))
        .write_stdin("q\n")
        .assert()
        .code(130);

    assert!(!dir.path().join("skills").exists());
}

#[test]
fn test_interactive_subset_to_project() {
    let dir = workspace("https://example.invalid/skills.git");

    // location 2 (project), then skill 2 (react)
    skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("repo"))
        .write_stdin("2\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: react"));

    assert!(dir.path().join("skills/react").exists());
    assert!(!dir.path().join("skills/etl").exists());
}

#[test]
fn test_check_updates_replaces_stale_files() {
    let dir = workspace("https://example.invalid/skills.git");
    let target = dir.path().join("out");
    write(&target.join("etl/old.md"), "stale");
    write(&target.join("mine/SKILL.md"), "local");

    skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("repo"))
        .arg("--target")
        .arg(&target)
        .arg("--check-updates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found skills: etl"));

    assert!(!target.join("etl/old.md").exists());
    assert!(target.join("etl/SKILL.md").exists());
    assert!(!target.join("react").exists());
    assert!(target.join("mine/SKILL.md").exists());
}

#[test]
fn test_robot_output_is_json() {
    let dir = workspace("https://example.invalid/skills.git");
    let target = dir.path().join("out");

    let output = skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("repo"))
        .arg("--target")
        .arg(&target)
        .arg("--robot")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["skills"].as_array().unwrap().len(), 2);
}

#[test]
fn test_robot_error_is_json() {
    let dir = workspace("https://example.invalid/skills.git");

    let output = skillsync(dir.path())
        .arg("--source-dir")
        .arg(dir.path().join("missing"))
        .args(["--project-install", "--robot"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "fetch_failed");
}

#[test]
fn test_clone_from_local_git_repository() {
    if which::which("git").is_err() {
        eprintln!("git not available, skipping");
        return;
    }
    let seed = workspace("unused");
    let repo = seed.path().join("repo");
    let git = |args: &[&str]| {
        let status = StdCommand::new("git")
            .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
            .args(args)
            .current_dir(&repo)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    };
    git(&["init", "--quiet"]);
    git(&["add", "."]);
    git(&["commit", "--quiet", "-m", "skills"]);

    let url = format!("file://{}", repo.display());
    let dir = workspace(&url);
    let target = dir.path().join("out");

    skillsync(dir.path())
        .arg("--target")
        .arg(&target)
        .arg("--yes")
        .assert()
        .success();

    assert!(target.join("etl/SKILL.md").exists());
    assert!(target.join("react/SKILL.md").exists());
}
