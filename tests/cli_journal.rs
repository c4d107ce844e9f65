use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bli"))
        .args(args)
        .env("HOME", home)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("run bli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn default_journal_lives_under_home() {
    let home = TempDir::new().expect("temp dir");

    let output = bli(home.path(), &["--today", "2024-03-05", "-a", "buy milk"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    // Piped stdout is not a terminal, so the symbol is not bolded.
    assert_eq!(stdout(&output), "0 • buy milk\n");

    let page = home.path().join(".bli").join("2024-03-05.txt");
    assert_eq!(fs::read_to_string(page).expect("read page"), "•buy milk");
}

#[test]
fn config_file_in_home_is_honoured() {
    let home = TempDir::new().expect("temp dir");
    let config_dir = home.path().join(".config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("bli.yml"),
        "journal_root: \"~/journal\"\nlayout: grouped\n",
    )
    .unwrap();

    let output = bli(home.path(), &["--today", "2024-03-05", "-a", "call bob"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let page = home
        .path()
        .join("journal")
        .join("2024-03-05")
        .join("tasks.txt");
    assert_eq!(fs::read_to_string(page).expect("read page"), "•call bob");
}

#[test]
fn next_day_carries_pending_tasks() {
    let home = TempDir::new().expect("temp dir");
    let journal = home.path().join("j");
    let journal_arg = journal.display().to_string();
    fs::create_dir_all(&journal).unwrap();
    fs::write(journal.join("2024-03-04.txt"), "vbuy milk\n•call bob").unwrap();

    let output = bli(
        home.path(),
        &["--journal", &journal_arg, "--today", "2024-03-05", "--all"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "0 • call bob\n");
    assert!(!journal.join("2024-03-04.txt").exists());
    assert_eq!(
        fs::read_to_string(journal.join("archives").join("2024-03-04.txt")).unwrap(),
        "vbuy milk\n>call bob"
    );
}

#[test]
fn corrupted_journal_exits_non_zero() {
    let home = TempDir::new().expect("temp dir");
    let journal = home.path().join("j");
    let journal_arg = journal.display().to_string();
    fs::create_dir_all(&journal).unwrap();
    fs::write(journal.join("2024-03-03.txt"), "•a").unwrap();
    fs::write(journal.join("2024-03-04.txt"), "•b").unwrap();

    let output = bli(
        home.path(),
        &["--journal", &journal_arg, "--today", "2024-03-05"],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(
        err.contains("Error: journal directory is corrupted"),
        "stderr: {err}"
    );
    assert!(!journal.join("2024-03-05.txt").exists());
    assert!(!journal.join("archives").exists());
}

#[test]
fn missing_index_warns_and_succeeds() {
    let home = TempDir::new().expect("temp dir");
    let output = bli(home.path(), &["--today", "2024-03-05", "-a", "one"]);
    assert!(output.status.success());

    let output = bli(home.path(), &["--today", "2024-03-05", "-v", "4", "-v", "0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Task n° 4 does not exist"),
        "stderr: {}",
        stderr(&output)
    );
    let page = home.path().join(".bli").join("2024-03-05.txt");
    assert_eq!(fs::read_to_string(page).unwrap(), "vone");
}

#[test]
fn negative_index_warns_and_succeeds() {
    let home = TempDir::new().expect("temp dir");
    let output = bli(home.path(), &["--today", "2024-03-05", "-a", "one", "-a", "two"]);
    assert!(output.status.success());

    let output = bli(home.path(), &["--today", "2024-03-05", "-x", "-1", "-x", "1"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Task n° -1 does not exist"),
        "stderr: {}",
        stderr(&output)
    );
    let page = home.path().join(".bli").join("2024-03-05.txt");
    assert_eq!(fs::read_to_string(page).unwrap(), "•one\nxtwo");
}

#[test]
fn help_lists_status_flags() {
    let home = TempDir::new().expect("temp dir");
    let output = bli(home.path(), &["--help"]);
    assert!(output.status.success());
    let help = stdout(&output);
    for flag in ["--add", "--cross", "--restore", "--check", "--postpone", "--filter"] {
        assert!(help.contains(flag), "help should mention {flag}: {help}");
    }
    assert!(!help.contains("--today"), "hidden flag leaked: {help}");
}
