//! `corrtrack` -- daily correlation-data pipeline daemon.
//!
//! Fetches historical crypto price data, computes correlations, and
//! publishes the resulting JSON files to a git remote. Runs the
//! pipeline once per day at a fixed UTC time, or immediately when
//! invoked with `--once`.
//!
//! Configuration is environment-variable driven; see
//! [`corrtrack_core::config`] for the full table. All variables have
//! defaults, so `corrtrack --once` inside a checked-out data
//! repository needs no setup.

use corrtrack_coingecko::CoinGeckoClient;
use corrtrack_core::config::PipelineConfig;
use corrtrack_daemon::trigger;
use corrtrack_pipeline::{run_pipeline, PublishOutcome, Trigger};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corrtrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let client = match CoinGeckoClient::new(config.api_url.clone(), config.request_delay) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    let once = std::env::args().any(|arg| arg == "--once");

    tracing::info!(
        repo_dir = %config.repo_dir.display(),
        api_url = %config.api_url,
        schedule_utc = %config.schedule_utc_time,
        once,
        "Starting corrtrack",
    );

    if once {
        match run_pipeline(&config, &client, Trigger::Manual).await {
            Ok(report) => {
                match report.outcome {
                    PublishOutcome::Published { commit } => {
                        tracing::info!(commit = %commit, "Manual run published data");
                    }
                    PublishOutcome::NoChanges => {
                        tracing::info!("Manual run finished with no changes");
                    }
                }
                std::process::exit(0);
            }
            Err(e) => {
                tracing::error!(error = %e, "Manual run failed");
                std::process::exit(1);
            }
        }
    }

    trigger::run_scheduler(&config, &client).await;
}
