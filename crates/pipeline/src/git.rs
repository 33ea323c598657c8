//! Thin async wrapper over the `git` binary.
//!
//! Every call runs `git -C <repo_dir> …` via [`tokio::process::Command`]
//! and captures stdout/stderr. Exit-status failures surface as
//! [`GitError::ExecutionFailed`] with the captured stderr.

use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;

/// Error type for git subprocess operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("git {command} failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Handle on a local git repository.
#[derive(Debug, Clone)]
pub struct GitRepo {
    repo_dir: PathBuf,
}

impl GitRepo {
    /// Wrap the repository rooted at `repo_dir`.
    pub fn new(repo_dir: &Path) -> Self {
        Self {
            repo_dir: repo_dir.to_path_buf(),
        }
    }

    /// Directory this handle operates in.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Run `git -C <repo_dir> <args…>` and return the raw output
    /// without checking the exit status.
    async fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .await
            .map_err(GitError::NotFound)
    }

    /// Run a git command and return trimmed stdout, failing on a
    /// non-zero exit status.
    async fn run_checked(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(GitError::ExecutionFailed {
                command: args.join(" "),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// True when `repo_dir` is inside a git work tree.
    ///
    /// A failing `rev-parse` (not a repository at all) reads as
    /// `false`, not as an error.
    pub async fn is_work_tree(&self) -> Result<bool, GitError> {
        let output = self.run(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(output.status.success()
            && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    /// URL of the named remote. Fails if the remote is not configured.
    pub async fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.run_checked(&["remote", "get-url", remote]).await
    }

    /// `git status --porcelain` restricted to `pathspec`.
    ///
    /// Returns one line per changed or untracked matching file; an
    /// empty vec means the pathspec's tree matches HEAD.
    pub async fn status_porcelain(&self, pathspec: &str) -> Result<Vec<String>, GitError> {
        let stdout = self
            .run_checked(&["status", "--porcelain", "--", pathspec])
            .await?;
        Ok(stdout.lines().map(|l| l.to_string()).collect())
    }

    /// Stage everything matching `pathspec`.
    pub async fn add(&self, pathspec: &str) -> Result<(), GitError> {
        self.run_checked(&["add", "--", pathspec]).await?;
        Ok(())
    }

    /// True when the index differs from HEAD.
    pub async fn has_staged_changes(&self) -> Result<bool, GitError> {
        // diff --cached --quiet exits 1 when staged changes exist.
        let output = self.run(&["diff", "--cached", "--quiet"]).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => Err(GitError::ExecutionFailed {
                command: "diff --cached --quiet".to_string(),
                exit_code: code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    /// Create a commit with the given author/committer identity.
    pub async fn commit(&self, name: &str, email: &str, message: &str) -> Result<(), GitError> {
        let user_name = format!("user.name={name}");
        let user_email = format!("user.email={email}");
        self.run_checked(&[
            "-c",
            user_name.as_str(),
            "-c",
            user_email.as_str(),
            "commit",
            "-m",
            message,
        ])
        .await?;
        Ok(())
    }

    /// Hash of the current HEAD commit.
    pub async fn head_commit(&self) -> Result<String, GitError> {
        self.run_checked(&["rev-parse", "HEAD"]).await
    }

    /// Push the checked-out branch to the same-named branch on `remote`.
    pub async fn push(&self, remote: &str) -> Result<(), GitError> {
        self.run_checked(&["push", remote, "HEAD"]).await?;
        Ok(())
    }

    /// Paths touched by `commit`, relative to the repo root.
    pub async fn changed_files(&self, commit: &str) -> Result<Vec<String>, GitError> {
        let stdout = self
            .run_checked(&["show", "--name-only", "--pretty=format:", commit])
            .await?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect())
    }
}
