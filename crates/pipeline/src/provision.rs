//! Provision stage: verify the checkout before anything runs.
//!
//! Mirrors the contract of a CI environment step: any failure here is
//! fatal and the fetch stage must never execute after one. Checks that
//! the configured directory is a git work tree, that the publish remote
//! is configured, and that the output directory exists (creating it on
//! first run).

use std::path::PathBuf;

use corrtrack_core::config::PipelineConfig;

use crate::git::{GitError, GitRepo};

/// Errors that abort the run before fetching.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("{0} is not inside a git work tree")]
    NotAWorkTree(PathBuf),

    #[error("remote '{remote}' is not configured: {source}")]
    RemoteMissing {
        remote: String,
        #[source]
        source: GitError,
    },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Verify the repository checkout and output directory.
pub async fn provision(config: &PipelineConfig) -> Result<GitRepo, ProvisionError> {
    let repo = GitRepo::new(&config.repo_dir);

    if !repo.is_work_tree().await? {
        return Err(ProvisionError::NotAWorkTree(config.repo_dir.clone()));
    }

    let remote_url = repo
        .remote_url(&config.remote)
        .await
        .map_err(|source| ProvisionError::RemoteMissing {
            remote: config.remote.clone(),
            source,
        })?;

    let output_dir = config.output_dir();
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|source| ProvisionError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

    tracing::info!(
        repo_dir = %config.repo_dir.display(),
        remote = %config.remote,
        remote_url = %remote_url,
        "Provisioned repository checkout",
    );

    Ok(repo)
}
