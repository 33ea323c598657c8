//! `corrtrack-pipeline` -- the fetch-and-publish pipeline.
//!
//! Three stages composed by a sequential, fail-fast runner:
//!
//! 1. [`provision`](provision::provision) -- verify the repository
//!    checkout is usable and the output directory exists.
//! 2. [`fetch`](fetch::fetch) -- pull price data, align it, compute
//!    correlations, write the JSON output files.
//! 3. [`publish`](publish::publish) -- stage `data/correlation/*.json`
//!    only, then commit and push if anything changed.
//!
//! Any stage error aborts the run; "nothing to publish" is a typed
//! success outcome, not an error.

pub mod fetch;
pub mod git;
pub mod provision;
pub mod publish;
pub mod runner;

pub use publish::PublishOutcome;
pub use runner::{run_pipeline, PipelineError, RunReport, Trigger};
