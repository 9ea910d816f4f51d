//! Git repository wrapper.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, IndexAddOption, Repository as Git2Repo, Signature, Time};
use tracing::debug;

use cvc2git_commit::CommitRecord;
use cvc2git_core::{INITIAL_HEAD, TargetError, TargetRepository, TargetResult};

use crate::{GitError, GitResult};

/// How the target repository is obtained at run start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapMode {
    /// Create a fresh repository; the path must not exist yet.
    CreateNew,
    /// Reuse a repository that already exists at the path.
    ReuseExisting,
}

/// The target git repository.
pub struct Repository {
    inner: Git2Repo,
    workdir: PathBuf,
}

impl Repository {
    /// Opens or creates the repository at `path` according to `mode`.
    ///
    /// # Errors
    ///
    /// With [`BootstrapMode::CreateNew`], fails if the path already
    /// exists. With [`BootstrapMode::ReuseExisting`], fails if it does
    /// not, or is not a git repository.
    pub fn bootstrap(path: impl AsRef<Path>, mode: BootstrapMode) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = match mode {
            BootstrapMode::CreateNew => {
                if path.exists() {
                    return Err(GitError::AlreadyExists(path.to_path_buf()));
                }
                std::fs::create_dir_all(path)?;
                debug!(?path, "initializing git repository");
                Git2Repo::init(path)?
            }
            BootstrapMode::ReuseExisting => {
                if !path.exists() {
                    return Err(GitError::RepoNotFound(path.to_path_buf()));
                }
                debug!(?path, "reusing git repository");
                Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?
            }
        };

        let workdir = inner
            .workdir()
            .ok_or_else(|| GitError::Bare(path.to_path_buf()))?
            .to_path_buf();

        Ok(Self { inner, workdir })
    }

    /// The parent of HEAD for the next commit, or `None` before the first
    /// commit.
    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, git2::Error> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Signature used for note objects. Commits never use it: they carry
    /// the source author verbatim.
    fn note_signature(&self) -> Result<Signature<'static>, git2::Error> {
        self.inner
            .signature()
            .or_else(|_| Signature::now("cvc2git", "cvc2git"))
    }
}

// Manual impl: git2::Repository has no Debug.
impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl TargetRepository for Repository {
    fn branch(&self) -> TargetResult<String> {
        // `head()` fails on an unborn branch; the symbolic HEAD reference
        // still names it.
        let head = self
            .inner
            .find_reference("HEAD")
            .map_err(|e| TargetError::Bootstrap(e.message().to_string()))?;
        let name = head
            .symbolic_target()
            .map_or_else(|| "HEAD".to_string(), |target| {
                target
                    .strip_prefix("refs/heads/")
                    .unwrap_or(target)
                    .to_string()
            });
        Ok(name)
    }

    fn head_description(&self) -> TargetResult<String> {
        let Some(commit) = self
            .head_commit()
            .map_err(|e| TargetError::Bootstrap(e.message().to_string()))?
        else {
            return Ok(INITIAL_HEAD.to_string());
        };

        let described = (|| -> Result<String, git2::Error> {
            let short = commit.as_object().short_id()?;
            Ok(format!(
                "{} {}",
                short.as_str().unwrap_or_default(),
                commit.summary().unwrap_or_default()
            ))
        })()
        .map_err(|e| TargetError::Bootstrap(e.message().to_string()))?;

        Ok(described)
    }

    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn stage_package(&self, package: &str) -> TargetResult<()> {
        let stage = || -> Result<(), git2::Error> {
            let mut index = self.inner.index()?;
            // add_all picks up new and modified files under the package
            // path; update_all drops entries whose files are gone.
            index.add_all([package], IndexAddOption::DEFAULT, None)?;
            index.update_all([package], None)?;
            index.write()
        };

        stage().map_err(|e| TargetError::Stage {
            package: package.to_string(),
            reason: e.message().to_string(),
        })
    }

    fn create_commit(&self, record: &CommitRecord, message: &str) -> TargetResult<()> {
        let commit = || -> Result<(), git2::Error> {
            // Author and committer are both the original cvc identity, at
            // the original second-precision UTC date. No converter
            // identity is attached.
            let when = Time::new(record.timestamp.timestamp(), 0);
            let signature = Signature::new(&record.author_name, &record.author_email, &when)?;

            let mut index = self.inner.index()?;
            let tree_id = index.write_tree()?;
            let tree = self.inner.find_tree(tree_id)?;

            let parent = self.head_commit()?;
            let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

            // No emptiness checks: an empty diff or an empty message is
            // still a recorded event in the source history.
            self.inner
                .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
            Ok(())
        };

        commit().map_err(|e| TargetError::Commit(e.message().to_string()))
    }

    fn read_resume_note(&self) -> TargetResult<Option<String>> {
        let Some(commit) = self
            .head_commit()
            .map_err(|e| TargetError::Note(e.message().to_string()))?
        else {
            return Ok(None);
        };

        match self.inner.find_note(None, commit.id()) {
            Ok(note) => Ok(note.message().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(TargetError::Note(e.message().to_string())),
        }
    }

    fn write_resume_note(&self, note: &str) -> TargetResult<()> {
        let write = || -> Result<(), git2::Error> {
            let head = self.inner.head()?.peel_to_commit()?;
            let signature = self.note_signature()?;
            self.inner
                .note(&signature, &signature, None, head.id(), note, true)?;
            Ok(())
        };

        write().map_err(|e| TargetError::Note(e.message().to_string()))
    }
}
