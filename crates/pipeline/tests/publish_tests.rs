//! Integration tests for the provision and publish stages against
//! throwaway git repositories.

mod common;

use assert_matches::assert_matches;

use common::{git, init_repos, origin_head};
use corrtrack_core::config::PipelineConfig;
use corrtrack_pipeline::git::GitRepo;
use corrtrack_pipeline::provision::{provision, ProvisionError};
use corrtrack_pipeline::publish::{publish, PublishOutcome};

// ---------------------------------------------------------------------------
// Provision stage
// ---------------------------------------------------------------------------

/// A plain directory (no `.git`) fails provisioning before anything
/// else can run.
#[tokio::test]
async fn provision_rejects_non_repository() {
    let tmp = tempfile::tempdir().unwrap();
    let config = PipelineConfig::for_repo(tmp.path());

    let err = provision(&config).await.unwrap_err();
    assert_matches!(err, ProvisionError::NotAWorkTree(_));
}

/// A repository without the configured remote fails provisioning.
#[tokio::test]
async fn provision_rejects_missing_remote() {
    let tmp = tempfile::tempdir().unwrap();
    git(tmp.path(), &["init"]);
    let config = PipelineConfig::for_repo(tmp.path());

    let err = provision(&config).await.unwrap_err();
    assert_matches!(err, ProvisionError::RemoteMissing { .. });
}

/// Provisioning a valid clone succeeds and creates the output
/// directory when it is missing.
#[tokio::test]
async fn provision_creates_output_directory() {
    let repos = init_repos();
    std::fs::remove_dir_all(repos.work.join("data/correlation")).unwrap();
    let config = PipelineConfig::for_repo(&repos.work);

    provision(&config).await.expect("provision succeeds");
    assert!(config.output_dir().is_dir());
}

// ---------------------------------------------------------------------------
// Publish stage: outcomes
// ---------------------------------------------------------------------------

/// A changed JSON file under `data/correlation/` produces exactly one
/// pushed commit containing that change.
#[tokio::test]
async fn publish_commits_and_pushes_changed_data() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);
    let head_before = origin_head(&repos);

    std::fs::write(
        repos.work.join("data/correlation/correlation_30d.json"),
        "{\n  \"nil_btc\": 0.7\n}",
    )
    .unwrap();

    let outcome = publish(&config, &repo).await.expect("publish succeeds");
    let commit = assert_matches!(outcome, PublishOutcome::Published { commit } => commit);

    // The commit made it to the remote.
    assert_eq!(origin_head(&repos), commit);
    assert_ne!(commit, head_before);

    let files = repo.changed_files(&commit).await.unwrap();
    assert_eq!(files, vec!["data/correlation/correlation_30d.json"]);

    // Fixed bot identity and message.
    let author = git(&repos.work, &["log", "-1", "--format=%an <%ae>"]);
    assert_eq!(
        author,
        "github-actions[bot] <github-actions[bot]@users.noreply.github.com>"
    );
    let message = git(&repos.work, &["log", "-1", "--format=%s"]);
    assert_eq!(message, "Update correlation data [automated]");
}

/// A byte-identical tree publishes as `NoChanges` with zero commits.
#[tokio::test]
async fn publish_unchanged_tree_is_a_typed_noop() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);
    let head_before = origin_head(&repos);

    let outcome = publish(&config, &repo).await.expect("publish succeeds");
    assert_eq!(outcome, PublishOutcome::NoChanges);
    assert_eq!(origin_head(&repos), head_before);
}

/// Rewriting a tracked file with identical bytes is still a no-op.
#[tokio::test]
async fn publish_identical_rewrite_is_a_noop() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);

    std::fs::write(
        repos.work.join("data/correlation/seed.json"),
        "{\n  \"seed\": true\n}",
    )
    .unwrap();

    let outcome = publish(&config, &repo).await.expect("publish succeeds");
    assert_eq!(outcome, PublishOutcome::NoChanges);
}

// ---------------------------------------------------------------------------
// Publish stage: path restriction
// ---------------------------------------------------------------------------

/// Files outside `data/correlation/` never reach a published commit,
/// even alongside a legitimate data change.
#[tokio::test]
async fn publish_ignores_files_outside_data_dir() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);

    std::fs::write(repos.work.join("stray.txt"), "oops").unwrap();
    std::fs::write(
        repos.work.join("data/correlation/aligned_30d.json"),
        "{\n  \"dates\": []\n}",
    )
    .unwrap();

    let outcome = publish(&config, &repo).await.expect("publish succeeds");
    let commit = assert_matches!(outcome, PublishOutcome::Published { commit } => commit);

    let files = repo.changed_files(&commit).await.unwrap();
    assert_eq!(files, vec!["data/correlation/aligned_30d.json"]);
}

/// Non-JSON files inside `data/correlation/` are excluded too; alone
/// they do not even trigger a commit.
#[tokio::test]
async fn publish_ignores_non_json_files_in_data_dir() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);
    let head_before = origin_head(&repos);

    std::fs::write(repos.work.join("data/correlation/debug.log"), "trace").unwrap();

    let outcome = publish(&config, &repo).await.expect("publish succeeds");
    assert_eq!(outcome, PublishOutcome::NoChanges);
    assert_eq!(origin_head(&repos), head_before);
}

// ---------------------------------------------------------------------------
// Publish stage: push failure
// ---------------------------------------------------------------------------

/// A push the remote cannot accept fails the stage; no fallback.
#[tokio::test]
async fn publish_surfaces_push_failure() {
    let repos = init_repos();
    let config = PipelineConfig::for_repo(&repos.work);
    let repo = GitRepo::new(&repos.work);

    // Point the remote somewhere that does not exist.
    git(
        &repos.work,
        &["remote", "set-url", "origin", "/nonexistent/origin.git"],
    );

    std::fs::write(
        repos.work.join("data/correlation/correlation_90d.json"),
        "{\n  \"nil_eth\": 0.5\n}",
    )
    .unwrap();

    let err = publish(&config, &repo).await.unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("push"), "unexpected error: {rendered}");
}
