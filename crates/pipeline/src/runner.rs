//! Sequential fail-fast executor for the three pipeline stages.
//!
//! One call of [`run_pipeline`] is one run: Provisioning → Fetching →
//! Publishing, each transition logged with the trigger that started the
//! run. The first stage error short-circuits the rest and becomes the
//! run's [`PipelineError`].

use std::fmt;

use corrtrack_coingecko::PriceSource;
use corrtrack_core::config::PipelineConfig;

use crate::fetch::{self, FetchError};
use crate::provision::{self, ProvisionError};
use crate::publish::{self, PublishError, PublishOutcome};

/// What started a run. Transparent to every stage: scheduled and manual
/// runs execute the identical sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The daily schedule fired.
    Scheduled,
    /// An operator asked for an immediate run.
    Manual,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Scheduled => write!(f, "scheduled"),
            Trigger::Manual => write!(f, "manual"),
        }
    }
}

/// Pipeline phase, for run-state logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Provisioning,
    Fetching,
    Publishing,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Provisioning => write!(f, "provisioning"),
            RunPhase::Fetching => write!(f, "fetching"),
            RunPhase::Publishing => write!(f, "publishing"),
        }
    }
}

/// First stage error of a failed run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("provision stage failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("publish stage failed: {0}")]
    Publish(#[from] PublishError),
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// What started the run.
    pub trigger: Trigger,
    /// Number of output files the fetch stage wrote.
    pub files_written: usize,
    /// Whether a commit was pushed or nothing had changed.
    pub outcome: PublishOutcome,
}

/// Execute one full pipeline run.
pub async fn run_pipeline(
    config: &PipelineConfig,
    source: &dyn PriceSource,
    trigger: Trigger,
) -> Result<RunReport, PipelineError> {
    tracing::info!(trigger = %trigger, phase = %RunPhase::Provisioning, "Run started");
    let repo = provision::provision(config).await?;

    tracing::info!(trigger = %trigger, phase = %RunPhase::Fetching, "Provisioned, fetching");
    let summary = fetch::fetch(config, source).await?;

    tracing::info!(trigger = %trigger, phase = %RunPhase::Publishing, "Fetched, publishing");
    let outcome = publish::publish(config, &repo).await?;

    match &outcome {
        PublishOutcome::Published { commit } => {
            tracing::info!(trigger = %trigger, commit = %commit, "Run done, data published");
        }
        PublishOutcome::NoChanges => {
            tracing::info!(trigger = %trigger, "Run done, no changes");
        }
    }

    Ok(RunReport {
        trigger,
        files_written: summary.files_written.len(),
        outcome,
    })
}
