use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fittrack(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fittrack").unwrap();
    cmd.env("FITTRACK_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("FITTRACK_PASSWORD");
    cmd
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track workouts"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("workout"))
        .stdout(predicate::str::contains("nutrition"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("_fittrack"));
}

#[test]
fn test_whoami_when_logged_out() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in."));
}

#[test]
fn test_protected_command_requires_login() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["workout", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_workout_log_rejects_unknown_group() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["workout", "log", "--group", "shoulders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'shoulders'"));
}

#[test]
fn test_nutrition_profile_set_requires_a_field() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["nutrition", "profile", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}
