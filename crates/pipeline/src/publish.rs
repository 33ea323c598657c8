//! Publish stage: commit and push changed correlation data.
//!
//! Staging is hard-restricted to `data/correlation/*.json`, so a
//! misbehaving fetch writing elsewhere can never leak into a published
//! commit. An unchanged tree is the [`PublishOutcome::NoChanges`]
//! success outcome rather than a swallowed commit error.

use corrtrack_core::config::{PipelineConfig, OUTPUT_DIR};

use crate::git::{GitError, GitRepo};

/// Pathspec the publish stage stages from. Nothing outside it is ever
/// committed.
pub const PUBLISH_PATHSPEC: &str = "data/correlation/*.json";

/// Result of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A commit was created and pushed.
    Published {
        /// Hash of the pushed commit.
        commit: String,
    },
    /// The correlation data was byte-identical to HEAD; nothing to do.
    NoChanges,
}

/// Errors that fail the publish stage (and the run). A rejected push
/// lands here; there is no retry or rebase.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Stage, commit, and push changed `data/correlation/*.json` files.
pub async fn publish(
    config: &PipelineConfig,
    repo: &GitRepo,
) -> Result<PublishOutcome, PublishError> {
    // `status --porcelain` tolerates a pathspec with zero matches,
    // unlike `add`, so probe with it first.
    let dirty = repo.status_porcelain(PUBLISH_PATHSPEC).await?;
    if dirty.is_empty() {
        tracing::info!(path = OUTPUT_DIR, "No correlation data changes to publish");
        return Ok(PublishOutcome::NoChanges);
    }

    repo.add(PUBLISH_PATHSPEC).await?;

    if !repo.has_staged_changes().await? {
        tracing::info!(path = OUTPUT_DIR, "Nothing staged after add, treating as no-op");
        return Ok(PublishOutcome::NoChanges);
    }

    repo.commit(&config.bot_name, &config.bot_email, &config.commit_message)
        .await?;
    let commit = repo.head_commit().await?;

    repo.push(&config.remote).await?;

    tracing::info!(
        commit = %commit,
        remote = %config.remote,
        files = dirty.len(),
        "Published correlation data",
    );

    Ok(PublishOutcome::Published { commit })
}
