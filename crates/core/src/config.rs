//! Environment-driven pipeline configuration.
//!
//! Every knob has a sensible default; the pipeline runs unconfigured in
//! a checked-out data repository. Malformed values are a startup error
//! rather than a silently-applied default.
//!
//! | Variable             | Default                                  |
//! |----------------------|------------------------------------------|
//! | `CORRTRACK_REPO_DIR` | `.`                                      |
//! | `COINGECKO_API_URL`  | `https://api.coingecko.com/api/v3`       |
//! | `FETCH_DELAY_SECS`   | `30`                                     |
//! | `GIT_REMOTE`         | `origin`                                 |
//! | `BOT_NAME`           | `github-actions[bot]`                    |
//! | `BOT_EMAIL`          | `github-actions[bot]@users.noreply.github.com` |
//! | `COMMIT_MESSAGE`     | `Update correlation data [automated]`    |
//! | `SCHEDULE_UTC_TIME`  | `00:00`                                  |

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;

/// Directory (relative to the repo root) the fetch stage writes to and
/// the publish stage stages from.
pub const OUTPUT_DIR: &str = "data/correlation";

/// Default CoinGecko REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Default delay before each API request, in seconds. CoinGecko's free
/// tier rate-limits aggressively.
pub const DEFAULT_FETCH_DELAY_SECS: u64 = 30;

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the git repository the pipeline fetches into and
    /// publishes from.
    pub repo_dir: PathBuf,
    /// CoinGecko REST API base URL.
    pub api_url: String,
    /// Delay applied before each API request.
    pub request_delay: Duration,
    /// Git remote pushed to.
    pub remote: String,
    /// Commit author/committer name.
    pub bot_name: String,
    /// Commit author/committer email.
    pub bot_email: String,
    /// Fixed commit message for published data updates.
    pub commit_message: String,
    /// UTC time of day the scheduled trigger fires.
    pub schedule_utc_time: NaiveTime,
}

/// Errors raised while resolving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be a UTC time in HH:MM form, got '{value}'")]
    InvalidTime { var: &'static str, value: String },
}

impl PipelineConfig {
    /// Resolve the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let repo_dir = lookup("CORRTRACK_REPO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let api_url = lookup("COINGECKO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let delay_secs = match lookup("FETCH_DELAY_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "FETCH_DELAY_SECS",
                value: raw,
            })?,
            None => DEFAULT_FETCH_DELAY_SECS,
        };

        let schedule_utc_time = match lookup("SCHEDULE_UTC_TIME") {
            Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|_| {
                ConfigError::InvalidTime {
                    var: "SCHEDULE_UTC_TIME",
                    value: raw,
                }
            })?,
            None => NaiveTime::MIN,
        };

        Ok(Self {
            repo_dir,
            api_url,
            request_delay: Duration::from_secs(delay_secs),
            remote: lookup("GIT_REMOTE").unwrap_or_else(|| "origin".to_string()),
            bot_name: lookup("BOT_NAME").unwrap_or_else(|| "github-actions[bot]".to_string()),
            bot_email: lookup("BOT_EMAIL")
                .unwrap_or_else(|| "github-actions[bot]@users.noreply.github.com".to_string()),
            commit_message: lookup("COMMIT_MESSAGE")
                .unwrap_or_else(|| "Update correlation data [automated]".to_string()),
            schedule_utc_time,
        })
    }

    /// Absolute or repo-relative path of the output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.repo_dir.join(OUTPUT_DIR)
    }

    /// Path of one output file inside the output directory.
    pub fn output_file(&self, file_name: &str) -> PathBuf {
        self.output_dir().join(file_name)
    }

    /// Configuration pointing at an existing repository with no delay
    /// between requests. Intended for tests.
    pub fn for_repo(repo_dir: &Path) -> Self {
        Self {
            repo_dir: repo_dir.to_path_buf(),
            api_url: DEFAULT_API_URL.to_string(),
            request_delay: Duration::ZERO,
            remote: "origin".to_string(),
            bot_name: "github-actions[bot]".to_string(),
            bot_email: "github-actions[bot]@users.noreply.github.com".to_string(),
            commit_message: "Update correlation data [automated]".to_string(),
            schedule_utc_time: NaiveTime::MIN,
        }
    }
}
