// Integration tests: the covenant binary end to end
//
// Each test runs the built binary in a scratch directory with HOME pointed
// at it, so no configuration file outside the test is picked up.

use std::process::{Command, Output};

use tempfile::TempDir;

const MAX: &str = "2147483647";

fn covenant(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_covenant"));
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("COVENANT_REACTION")
        .env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run covenant")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ===== Success Tests =====

#[test]
fn test_increment_prints_new_and_old_value() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir).args(["increment", "--value", "5"]));

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "5\n6:5\n");
}

#[test]
fn test_no_contracts_lets_increment_wrap() {
    let dir = TempDir::new().unwrap();

    let output = run(covenant(&dir).args(["--no-contracts", "increment", "--value", "5"]));
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "5\n6:5\n");

    let output = run(covenant(&dir).args(["--no-contracts", "increment", "--value", MAX]));
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("-2147483648:2147483647"));
}

#[test]
fn test_log_reaction_continues_past_violations() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir).args(["--reaction", "log", "increment", "--value", MAX]));

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Precondition violated"), "{}", out);
    assert!(out.contains("Postcondition violated"), "{}", out);
    assert!(out.contains("-2147483648:2147483647"), "{}", out);
}

// ===== Configuration Tests =====

#[test]
fn test_reaction_from_environment() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir).env("COVENANT_REACTION", "log").arg("config"));

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("reaction = \"log\""));
}

#[test]
fn test_flag_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contracts.toml");
    std::fs::write(&path, "reaction = \"log\"\n").unwrap();

    let output = run(covenant(&dir).arg("--config").arg(&path).arg("config"));
    assert!(stdout(&output).contains("reaction = \"log\""));

    let output = run(covenant(&dir)
        .arg("--config")
        .arg(&path)
        .args(["--reaction", "abort", "config"]));
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("reaction = \"abort\""));
}

#[test]
fn test_unknown_reaction_in_environment_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir)
        .env("COVENANT_REACTION", "bogus")
        .args(["increment", "--value", "5"]));

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("bogus"));
    assert!(stdout(&output).is_empty());
}

// ===== Violation Tests =====

#[test]
fn test_raised_violation_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir).args(["increment", "--value", MAX]));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Precondition violated in 'increment'"));
    assert_eq!(stdout(&output), format!("{}\n", MAX));
}

#[test]
fn test_abort_reaction_aborts_the_process() {
    let dir = TempDir::new().unwrap();
    let output = run(covenant(&dir).args(["--reaction", "abort", "increment", "--value", MAX]));

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("fatal: Precondition violated in 'increment'"));
}
