//! End-to-end tests for the `prune_backups` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::Local;
use predicates::prelude::*;
use tempfile::TempDir;

fn prune_backups() -> Command {
    let mut cmd = Command::cargo_bin("prune_backups").unwrap();
    cmd.env_remove("PRUNE_BACKUPS_CONFIG")
        .env_remove("PRUNE_BACKUPS_LOG_LEVEL")
        .env("NO_COLOR", "1");
    cmd
}

/// Two backups in the current hour plus an unrelated directory.
/// Returns (older, newer).
fn seed(root: &Path) -> (String, String) {
    let hour = Local::now().format("%Y-%m-%d_%H").to_string();
    let older = format!("{hour}-00");
    let newer = format!("{hour}-01");
    for name in [older.as_str(), newer.as_str(), "notes"] {
        fs::create_dir(root.join(name)).unwrap();
    }
    fs::write(root.join(&older).join("data.bin"), b"0123456789").unwrap();
    (older, newer)
}

#[test]
fn test_version_command() {
    prune_backups()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("prune_backups "))
        .stdout(predicate::str::contains(std::env::consts::OS));
}

#[test]
fn test_help_explains_retention() {
    prune_backups()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("RETENTION"));
}

#[test]
fn test_from_moves_older_backup() {
    let temp = TempDir::new().unwrap();
    let (older, newer) = seed(temp.path());

    prune_backups()
        .args(["from", "-v", "2"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("I found 3 directories"))
        .stdout(predicate::str::contains("Skipping notes as it is not in date format."))
        .stdout(predicate::str::contains("I moved 1 directories to"));

    assert!(temp.path().join("to_delete").join(&older).is_dir());
    assert!(temp.path().join(&newer).is_dir());
    assert!(temp.path().join("notes").is_dir());
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let (older, _) = seed(temp.path());

    prune_backups()
        .args(["from", "--dry-run"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: I would move 1 directories"))
        .stdout(predicate::str::contains(format!(" - {older}")));

    assert!(temp.path().join(&older).is_dir());
    assert!(!temp.path().join("to_delete").exists());
}

#[cfg(unix)]
#[test]
fn test_custom_archive_name_and_stats() {
    let temp = TempDir::new().unwrap();
    let (older, _) = seed(temp.path());

    prune_backups()
        .args(["from", "--to", "old", "--stats"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("now contains:"));

    assert!(temp.path().join("old").join(&older).is_dir());
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    let (older, newer) = seed(temp.path());

    let output = prune_backups()
        .args(["from", "--json", "--dry-run"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let classification = &value["report"]["classification"];
    assert_eq!(classification["discard"][0], older.as_str());
    assert_eq!(classification["keep"][0], newer.as_str());
    assert_eq!(classification["ignored"][0], "notes");
    assert_eq!(value["report"]["dry_run"], true);
}

#[test]
fn test_quiet_run_prints_nothing() {
    let temp = TempDir::new().unwrap();
    seed(temp.path());

    prune_backups()
        .args(["from", "-v", "0"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_directory_fails() {
    let temp = TempDir::new().unwrap();

    prune_backups()
        .arg("from")
        .arg(temp.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent"));
}

#[test]
fn test_archive_outside_the_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let backups = temp.path().join("backups");
    fs::create_dir(&backups).unwrap();
    let (older, _) = seed(&backups);

    for to in ["../outside", "/tmp/prune_backups_outside"] {
        prune_backups()
            .args(["from", "--to", to])
            .arg(&backups)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid archive directory name"));
    }

    assert!(backups.join(&older).is_dir());
    assert!(!temp.path().join("outside").exists());
}

#[test]
fn test_verbosity_out_of_range_is_rejected() {
    let temp = TempDir::new().unwrap();

    prune_backups()
        .args(["from", "-v", "3"])
        .arg(temp.path())
        .assert()
        .failure();
}

#[test]
fn test_explicit_config_must_exist() {
    let temp = TempDir::new().unwrap();

    prune_backups()
        .arg("--config")
        .arg(temp.path().join("nope.toml"))
        .arg("from")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_file_sets_archive_dir() {
    let temp = TempDir::new().unwrap();
    let backups = temp.path().join("backups");
    fs::create_dir(&backups).unwrap();
    let (older, _) = seed(&backups);
    let config = temp.path().join("config.toml");
    fs::write(&config, "archive_dir = \"trash\"\nverbosity = 0\n").unwrap();

    prune_backups()
        .env("PRUNE_BACKUPS_CONFIG", &config)
        .arg("from")
        .arg(&backups)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(backups.join("trash").join(&older).is_dir());
}
