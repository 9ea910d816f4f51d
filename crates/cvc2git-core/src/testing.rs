//! In-memory fakes for the capability traits, shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use cvc2git_commit::CommitRecord;

use crate::{
    INITIAL_HEAD, SOURCE_METADATA_FILE, SourceControl, SourceError, SourceResult, TargetRepository,
    TargetResult,
};

/// A commit record fixture; `hour` orders commits within one test day.
pub fn make_commit(package: &str, revision: &str, hour: u32, message: &str) -> CommitRecord {
    CommitRecord::new(
        package,
        "/foresight.rpath.org@fl:2-devel",
        revision,
        "Og Maciel",
        "omaciel@foresightlinux.org",
        Utc.with_ymd_and_hms(2010, 1, 29, hour, 0, 0).unwrap(),
        message,
    )
}

/// A fake source system that materializes a one-file tree per revision.
#[derive(Default)]
pub struct FakeSource {
    fail_revisions: HashSet<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes checkout of the given revision fail.
    pub fn failing_at(mut self, revision: &str) -> Self {
        self.fail_revisions.insert(revision.to_string());
        self
    }
}

impl SourceControl for FakeSource {
    fn fetch_log(&self, package: &str) -> SourceResult<String> {
        // The core pipeline is handed log text directly; fetching is the
        // caller's concern.
        Err(SourceError::FetchLog {
            package: package.to_string(),
            reason: "fake source serves no logs".to_string(),
        })
    }

    fn checkout(
        &self,
        package: &str,
        _branch: &str,
        revision: &str,
        dest: &Path,
    ) -> SourceResult<()> {
        if self.fail_revisions.contains(revision) {
            return Err(SourceError::Checkout {
                package: package.to_string(),
                revision: revision.to_string(),
                reason: "materialization failed".to_string(),
            });
        }

        fs::create_dir_all(dest)?;
        fs::write(dest.join("content.txt"), format!("{package}@{revision}\n"))?;
        // Real checkouts carry the bookkeeping file; the engine must scrub it.
        fs::write(dest.join(SOURCE_METADATA_FILE), "bookkeeping\n")?;
        Ok(())
    }
}

/// A fake target repository that records staging and commits in memory
/// while exposing a real temporary working directory.
pub struct FakeTarget {
    workdir: TempDir,
    commits: RefCell<Vec<(CommitRecord, String)>>,
    staged: RefCell<Vec<Vec<String>>>,
    note: RefCell<Option<String>>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self {
            workdir: TempDir::new().expect("temp workdir"),
            commits: RefCell::new(Vec::new()),
            staged: RefCell::new(Vec::new()),
            note: RefCell::new(None),
        }
    }

    /// Seeds the resume note, as if left by an earlier run.
    pub fn with_note(self, note: &str) -> Self {
        *self.note.borrow_mut() = Some(note.to_string());
        self
    }

    /// Commits created so far, in creation order, with their full message.
    pub fn commits(&self) -> Vec<(CommitRecord, String)> {
        self.commits.borrow().clone()
    }

    /// File-name snapshots taken at each staging call.
    pub fn staged_trees(&self) -> Vec<Vec<String>> {
        self.staged.borrow().clone()
    }

    /// The current resume note, if written.
    pub fn note(&self) -> Option<String> {
        self.note.borrow().clone()
    }
}

impl TargetRepository for FakeTarget {
    fn branch(&self) -> TargetResult<String> {
        Ok("master".to_string())
    }

    fn head_description(&self) -> TargetResult<String> {
        let commits = self.commits.borrow();
        Ok(commits.last().map_or_else(
            || INITIAL_HEAD.to_string(),
            |(record, _)| format!("{} {}", record.revision, record.subject()),
        ))
    }

    fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    fn stage_package(&self, package: &str) -> TargetResult<()> {
        let tree = self.workdir.path().join(package);
        let mut names = Vec::new();
        if tree.is_dir() {
            for entry in fs::read_dir(&tree)? {
                names.push(entry?.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        self.staged.borrow_mut().push(names);
        Ok(())
    }

    fn create_commit(&self, record: &CommitRecord, message: &str) -> TargetResult<()> {
        self.commits
            .borrow_mut()
            .push((record.clone(), message.to_string()));
        Ok(())
    }

    fn read_resume_note(&self) -> TargetResult<Option<String>> {
        Ok(self.note.borrow().clone())
    }

    fn write_resume_note(&self, note: &str) -> TargetResult<()> {
        *self.note.borrow_mut() = Some(note.to_string());
        Ok(())
    }
}
