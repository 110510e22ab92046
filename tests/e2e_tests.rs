//! End-to-end tests for the CLI commands.
//!
//! Each test runs the binary inside a temp working directory, so the
//! catalog and any archives land there.

// Allow deprecated cargo_bin usage until assert_cmd updates API
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Build a command running in the given working directory.
fn tool(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("archive-tool").unwrap();
    cmd.current_dir(dir).env("RUST_LOG", "info");
    cmd
}

/// Working dir with a `data/` tree of three small files.
fn setup() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).unwrap();
    fs::write(data.join("one.txt"), "first").unwrap();
    fs::write(data.join("two.txt"), "second").unwrap();
    fs::write(data.join("nested/three.txt"), "third").unwrap();
    dir
}

fn zip_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

// ─── init ───────────────────────────────────────────────────────────────────

#[test]
fn e2e_init_creates_catalog() {
    let dir = setup();
    tool(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":true"));
    assert!(dir.path().join("archive-tool.sqlite3").exists());

    tool(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":false"));
}

#[test]
fn e2e_db_flag_moves_catalog() {
    let dir = setup();
    tool(dir.path()).args(["--db", "elsewhere.db", "init"]).assert().success();
    assert!(dir.path().join("elsewhere.db").exists());
    assert!(!dir.path().join("archive-tool.sqlite3").exists());
}

// ─── scan ───────────────────────────────────────────────────────────────────

#[test]
fn e2e_scan_reports_created_files() {
    let dir = setup();
    tool(dir.path())
        .args(["scan", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":3"))
        .stderr(predicate::str::contains("new-scanned"));
}

#[test]
fn e2e_rescan_is_unchanged() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path())
        .args(["scan", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unchanged\":3"))
        .stdout(predicate::str::contains("created").not());
}

#[test]
fn e2e_scan_mtime_mode() {
    let dir = setup();
    tool(dir.path())
        .args(["scan", "data", "--mode", "mtime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":3"));
}

#[test]
fn e2e_scan_detects_changes_and_deletions() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();

    fs::write(dir.path().join("data/one.txt"), "first, edited").unwrap();
    fs::remove_file(dir.path().join("data/two.txt")).unwrap();

    tool(dir.path())
        .args(["scan", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"updated\":1"))
        .stdout(predicate::str::contains("\"missing\":1"));

    tool(dir.path())
        .args(["list", "--state", "error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two.txt"))
        .stdout(predicate::str::contains("File no longer exists at path"));
}

#[test]
fn e2e_scan_missing_root_fails_without_catalog() {
    let dir = setup();
    tool(dir.path())
        .args(["scan", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    assert!(!dir.path().join("archive-tool.sqlite3").exists());
}

#[test]
fn e2e_scan_of_work_dir_skips_catalog() {
    let dir = setup();
    tool(dir.path()).arg("init").assert().success();
    tool(dir.path())
        .args(["scan", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_seen\":3"));
}

// ─── archive ────────────────────────────────────────────────────────────────

#[test]
fn e2e_archive_packs_eligible_files() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path())
        .args(["archive", "backup.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup.zip"));

    let entries = zip_entries(&dir.path().join("backup.zip"));
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().any(|e| e.ends_with("data/nested/three.txt")));

    tool(dir.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\":\"archived\",\"count\":3"));
}

#[test]
fn e2e_archive_with_nothing_eligible_creates_no_file() {
    let dir = setup();
    tool(dir.path())
        .args(["archive", "empty.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"archived\":[]"));
    assert!(!dir.path().join("empty.zip").exists());
}

#[test]
fn e2e_archive_into_scanned_tree_skips_itself() {
    let dir = setup();
    fs::write(dir.path().join("data/backup.zip"), "old archive").unwrap();
    tool(dir.path()).args(["scan", "data"]).assert().success();

    tool(dir.path())
        .args(["archive", "data/../data/backup.zip"])
        .assert()
        .success();

    let entries = zip_entries(&dir.path().join("data/backup.zip"));
    assert_eq!(entries.len(), 3);
    assert!(!entries.iter().any(|e| e.ends_with("backup.zip")));
}

#[test]
fn e2e_archive_partial_failure() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    fs::remove_file(dir.path().join("data/two.txt")).unwrap();

    tool(dir.path())
        .args(["archive", "partial.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"failed\""));

    let entries = zip_entries(&dir.path().join("partial.zip"));
    assert_eq!(entries.len(), 2);
    assert!(!entries.iter().any(|e| e.ends_with("two.txt")));

    tool(dir.path())
        .args(["list", "--state", "error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"));
}

#[test]
fn e2e_archived_file_is_rearchived_after_change() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path()).args(["archive", "first.zip"]).assert().success();

    tool(dir.path())
        .args(["scan", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"archived_ineligible\":3"));

    fs::write(dir.path().join("data/one.txt"), "changed").unwrap();
    tool(dir.path()).args(["scan", "data"]).assert().success();

    tool(dir.path()).args(["archive", "second.zip"]).assert().success();
    let entries = zip_entries(&dir.path().join("second.zip"));
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with("data/one.txt"));
}

// ─── status / list ──────────────────────────────────────────────────────────

#[test]
fn e2e_status_empty_catalog() {
    let dir = setup();
    tool(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("DATABASE EMPTY"));
}

#[test]
fn e2e_status_table() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("STATUS OF FILES"))
        .stdout(predicate::str::contains("New-scanned: 3"))
        .stdout(predicate::str::contains("Total: 3"));
}

#[test]
fn e2e_status_json_from_settings() {
    let dir = setup();
    fs::write(
        dir.path().join("archive-tool.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":3"));
}

#[test]
fn e2e_list_eligible() {
    let dir = setup();
    tool(dir.path()).args(["scan", "data"]).assert().success();
    tool(dir.path())
        .args(["list", "--eligible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":3"));
}

#[test]
fn e2e_quiet_suppresses_progress() {
    let dir = setup();
    tool(dir.path())
        .env_remove("RUST_LOG")
        .args(["--quiet", "scan", "data"])
        .assert()
        .success()
        .stderr(predicate::str::contains("new-scanned").not());
}
