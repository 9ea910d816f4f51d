//! End-to-end CLI tests.
//!
//! These run the real binary against a temporary git repository and a
//! stub `cvc` executable placed on PATH, so the whole pipeline is
//! exercised without a Conary installation.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A cvc stand-in. `checkout` materializes a one-file tree (plus the
/// CONARY bookkeeping file), failing for the trove named by
/// `CVC2GIT_TEST_FAIL`; `log` serves files from the directory named by
/// `CVC2GIT_TEST_LOGS`.
const STUB_CVC: &str = r#"#!/bin/sh
case "$1" in
  checkout)
    trove="$2"
    if [ -n "$CVC2GIT_TEST_FAIL" ] && [ "$trove" = "$CVC2GIT_TEST_FAIL" ]; then
      echo "cannot materialize $trove" >&2
      exit 1
    fi
    dir="${3#--dir=}"
    pkg="${trove%%=*}"
    mkdir -p "$dir"
    printf '%s\n' "$trove" > "$dir/$pkg.txt"
    printf 'bookkeeping\n' > "$dir/CONARY"
    ;;
  log)
    pkg="${2%%:*}"
    cat "$CVC2GIT_TEST_LOGS/$pkg.log"
    ;;
  *)
    echo "unexpected cvc invocation: $*" >&2
    exit 1
    ;;
esac
"#;

/// Installs the stub and returns a PATH value that resolves `cvc` to it.
fn stub_cvc_path(dir: &Path) -> String {
    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let cvc = bin.join("cvc");
    std::fs::write(&cvc, STUB_CVC).unwrap();
    let mut perms = std::fs::metadata(&cvc).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&cvc, perms).unwrap();

    format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    )
}

/// Builds a cached log: metadata, then `(revision, time, message)` blocks
/// newest-first, all dated Fri Jan 29 2010.
fn write_log(history_dir: &Path, package: &str, entries: &[(&str, &str, &str)]) {
    std::fs::create_dir_all(history_dir).unwrap();
    let mut text = format!("Name  : {package}:source\nBranch: /fl:2-devel\n\n");
    for (revision, time, message) in entries {
        text.push_str(&format!(
            "{revision} Og Maciel (omaciel@foresightlinux.org) Fri Jan 29 {time} 2010\n    {message}\n\n"
        ));
    }
    std::fs::write(history_dir.join(format!("{package}.log")), text).unwrap();
}

fn cvc2git() -> Command {
    Command::cargo_bin("cvc2git").unwrap()
}

/// Oldest-first commit messages reachable from HEAD.
fn commit_messages(git_dir: &Path) -> Vec<String> {
    let repo = git2::Repository::open(git_dir).unwrap();
    let mut walk = repo.revwalk().unwrap();
    walk.push_head().unwrap();
    let mut messages: Vec<String> = walk
        .map(|oid| {
            let commit = repo.find_commit(oid.unwrap()).unwrap();
            commit.message().unwrap_or("").to_string()
        })
        .collect();
    messages.reverse();
    messages
}

fn head_note(git_dir: &Path) -> Option<String> {
    let repo = git2::Repository::open(git_dir).unwrap();
    let head = repo.head().unwrap().target().unwrap();
    repo.find_note(None, head)
        .ok()
        .and_then(|note| note.message().map(str::to_string))
}

#[test]
fn test_missing_required_options() {
    cvc2git()
        .arg("epdb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--history-dir"));
}

#[test]
fn test_no_packages_given() {
    let tmp = TempDir::new().unwrap();
    cvc2git()
        .arg("--history-dir")
        .arg(tmp.path().join("history"))
        .arg("--git-dir")
        .arg(tmp.path().join("repo"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to convert"));
}

#[test]
fn test_existing_git_dir_without_reuse_flag() {
    let tmp = TempDir::new().unwrap();
    let git_dir = tmp.path().join("repo");
    std::fs::create_dir_all(&git_dir).unwrap();

    cvc2git()
        .arg("--history-dir")
        .arg(tmp.path().join("history"))
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_malformed_log_leaves_repo_untouched() {
    let tmp = TempDir::new().unwrap();
    let history = tmp.path().join("history");
    std::fs::create_dir_all(&history).unwrap();
    std::fs::write(history.join("epdb.log"), "this is not a cvc log\n").unwrap();
    let git_dir = tmp.path().join("repo");

    cvc2git()
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed"));

    // The repository was bootstrapped but holds no commits.
    let repo = git2::Repository::open(&git_dir).unwrap();
    assert!(repo.head().is_err());
}

#[test]
fn test_full_conversion_and_incremental_rerun() {
    let tmp = TempDir::new().unwrap();
    let path = stub_cvc_path(tmp.path());
    let history = tmp.path().join("history");
    let git_dir = tmp.path().join("repo");

    write_log(
        &history,
        "epdb",
        &[("tip-2", "03:00:00", "epdb second"), ("tip-1", "01:00:00", "epdb first")],
    );
    write_log(
        &history,
        "zlib",
        &[("1-2", "04:00:00", "zlib second"), ("1-1", "02:00:00", "zlib first")],
    );

    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb:source")
        .arg("zlib")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 4 commit(s)"));

    let messages = commit_messages(&git_dir);
    assert_eq!(
        messages,
        [
            "epdb first\n\ncvc revision: tip-1",
            "zlib first\n\ncvc revision: 1-1",
            "epdb second\n\ncvc revision: tip-2",
            "zlib second\n\ncvc revision: 1-2",
        ]
    );

    // Authorship preserved, tracked files only.
    let repo = git2::Repository::open(&git_dir).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.author().name(), Some("Og Maciel"));
    assert_eq!(head.author().email(), Some("omaciel@foresightlinux.org"));
    let tree = head.tree().unwrap();
    let zlib = repo
        .find_tree(tree.get_name("zlib").unwrap().id())
        .unwrap();
    assert!(zlib.get_name("zlib.txt").is_some());
    assert!(zlib.get_name("CONARY").is_none());

    assert_eq!(head_note(&git_dir), Some("epdb=tip-2 zlib=1-2".to_string()));

    // Re-running against the same logs converts nothing and is still a
    // success.
    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-init-git")
        .arg("--no-fetch")
        .arg("epdb")
        .arg("zlib")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to convert"));
    assert_eq!(commit_messages(&git_dir).len(), 4);
}

#[test]
fn test_incremental_rerun_appends_new_history() {
    let tmp = TempDir::new().unwrap();
    let path = stub_cvc_path(tmp.path());
    let history = tmp.path().join("history");
    let git_dir = tmp.path().join("repo");

    write_log(&history, "epdb", &[("tip-1", "01:00:00", "first")]);
    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .success();

    // A new revision appears upstream.
    write_log(
        &history,
        "epdb",
        &[("tip-2", "02:00:00", "second"), ("tip-1", "01:00:00", "first")],
    );
    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-init-git")
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 commit(s)"));

    let messages = commit_messages(&git_dir);
    assert_eq!(messages.len(), 2);
    assert!(messages[1].starts_with("second"));
    assert_eq!(head_note(&git_dir), Some("epdb=tip-2".to_string()));
}

#[test]
fn test_checkout_failure_keeps_earlier_commits() {
    let tmp = TempDir::new().unwrap();
    let path = stub_cvc_path(tmp.path());
    let history = tmp.path().join("history");
    let git_dir = tmp.path().join("repo");

    write_log(
        &history,
        "epdb",
        &[("tip-2", "02:00:00", "second"), ("tip-1", "01:00:00", "first")],
    );

    // The second revision cannot be materialized.
    cvc2git()
        .env("PATH", &path)
        .env("CVC2GIT_TEST_FAIL", "epdb=/fl:2-devel/tip-2")
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("epdb=tip-2"));

    // The commit before the failure survives and the resume note names
    // it, so a healthy re-run appends only the missing one.
    assert_eq!(commit_messages(&git_dir).len(), 1);
    assert_eq!(head_note(&git_dir), Some("epdb=tip-1".to_string()));

    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-init-git")
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 commit(s)"));
    assert_eq!(commit_messages(&git_dir).len(), 2);
}

#[test]
fn test_ambiguous_resume_aborts() {
    let tmp = TempDir::new().unwrap();
    let path = stub_cvc_path(tmp.path());
    let history = tmp.path().join("history");
    let git_dir = tmp.path().join("repo");

    write_log(&history, "epdb", &[("tip-1", "01:00:00", "first")]);
    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .success();

    // Upstream history was rewritten: tip-1 no longer exists.
    write_log(&history, "epdb", &[("tip-9", "09:00:00", "rewritten")]);
    cvc2git()
        .env("PATH", &path)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("--no-init-git")
        .arg("--no-fetch")
        .arg("epdb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source history may have been rewritten"));

    // Still exactly the one commit from the first run.
    assert_eq!(commit_messages(&git_dir).len(), 1);
}

#[test]
fn test_refresh_populates_log_cache() {
    let tmp = TempDir::new().unwrap();
    let path = stub_cvc_path(tmp.path());
    let history = tmp.path().join("history");
    let git_dir = tmp.path().join("repo");

    // Upstream logs live where the stub's `log` subcommand reads them.
    let upstream: PathBuf = tmp.path().join("upstream");
    write_log(&upstream, "epdb", &[("tip-1", "01:00:00", "first")]);

    cvc2git()
        .env("PATH", &path)
        .env("CVC2GIT_TEST_LOGS", &upstream)
        .arg("--history-dir")
        .arg(&history)
        .arg("--git-dir")
        .arg(&git_dir)
        .arg("epdb")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1 commit(s)"));

    // The fetched log is now cached for --no-fetch runs.
    let cached = std::fs::read_to_string(history.join("epdb.log")).unwrap();
    assert!(cached.starts_with("Name  : epdb:source"));
}
