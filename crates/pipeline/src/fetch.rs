//! Fetch stage: pull prices, align, correlate, write JSON output.
//!
//! Per timeframe the stage fetches every tracked token, writes each
//! successful token's raw series, and only proceeds to aligned and
//! correlation output when at least two tokens (including the base
//! token) came back. A token that fails to fetch is logged and skipped,
//! so one flaky coin does not lose the rest of the day's data; the
//! stage as a whole fails only on I/O errors or when *no* token could
//! be fetched at all.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use corrtrack_coingecko::PriceSource;
use corrtrack_core::config::PipelineConfig;
use corrtrack_core::correlation::return_correlation;
use corrtrack_core::series::{align, PricePoint};
use corrtrack_core::token::{pair_key, Timeframe, BASE_TOKEN, TIMEFRAMES, TRACKED_TOKENS};

/// Errors that abort the run during fetching.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every token fetch failed in every timeframe. Distinguishes a
    /// dead API from a legitimately unchanged data set.
    #[error("no price data could be fetched for any token in any timeframe")]
    AllSourcesFailed,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {file}: {source}")]
    Serialize {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What the fetch stage produced.
#[derive(Debug, Default)]
pub struct FetchSummary {
    /// Output files written this run, in write order.
    pub files_written: Vec<PathBuf>,
}

/// Run the fetch stage over every configured timeframe.
pub async fn fetch(
    config: &PipelineConfig,
    source: &dyn PriceSource,
) -> Result<FetchSummary, FetchError> {
    let mut summary = FetchSummary::default();
    let mut any_token_fetched = false;

    for timeframe in TIMEFRAMES {
        let fetched = fetch_timeframe(config, source, *timeframe, &mut summary).await?;
        any_token_fetched |= fetched;
    }

    if !any_token_fetched {
        return Err(FetchError::AllSourcesFailed);
    }

    tracing::info!(
        files_written = summary.files_written.len(),
        "Fetch stage complete",
    );
    Ok(summary)
}

/// Fetch, align, and correlate one timeframe. Returns whether at least
/// one token was fetched successfully.
async fn fetch_timeframe(
    config: &PipelineConfig,
    source: &dyn PriceSource,
    timeframe: Timeframe,
    summary: &mut FetchSummary,
) -> Result<bool, FetchError> {
    tracing::info!(timeframe = timeframe.name, "Fetching price data");

    let mut token_data: BTreeMap<String, Vec<PricePoint>> = BTreeMap::new();

    for token in TRACKED_TOKENS {
        match source.fetch_daily(token.coin_id, timeframe.days).await {
            Ok(points) if !points.is_empty() => {
                let file = config.output_file(&format!("{}_{}.json", token.coin_id, timeframe.name));
                write_json(&file, &points, summary).await?;
                token_data.insert(token.coin_id.to_string(), points);
            }
            Ok(_) => {
                tracing::warn!(
                    coin_id = token.coin_id,
                    timeframe = timeframe.name,
                    "Source returned an empty series, skipping token",
                );
            }
            Err(e) => {
                tracing::warn!(
                    coin_id = token.coin_id,
                    timeframe = timeframe.name,
                    error = %e,
                    "Failed to fetch token, skipping",
                );
            }
        }
    }

    let any_fetched = !token_data.is_empty();

    // Correlation needs the base token plus at least one counterpart.
    if token_data.len() < 2 {
        tracing::warn!(
            timeframe = timeframe.name,
            fetched = token_data.len(),
            "Not enough token data, skipping correlation output",
        );
        return Ok(any_fetched);
    }
    if !token_data.contains_key(BASE_TOKEN.coin_id) {
        tracing::warn!(
            timeframe = timeframe.name,
            base = BASE_TOKEN.coin_id,
            "Base token data missing, skipping correlation output",
        );
        return Ok(any_fetched);
    }

    let aligned = align(&token_data);
    if aligned.is_empty() {
        tracing::warn!(
            timeframe = timeframe.name,
            "No common day buckets across tokens, skipping correlation output",
        );
        return Ok(any_fetched);
    }

    let aligned_file = config.output_file(&format!("aligned_{}.json", timeframe.name));
    write_json(&aligned_file, &aligned, summary).await?;

    if aligned.len() < 2 {
        tracing::warn!(
            timeframe = timeframe.name,
            "Only one aligned day, correlations undefined",
        );
        return Ok(any_fetched);
    }

    let base_prices = &aligned.prices[BASE_TOKEN.coin_id];
    let mut correlations: BTreeMap<String, f64> = BTreeMap::new();

    for token in TRACKED_TOKENS {
        if token.coin_id == BASE_TOKEN.coin_id {
            continue;
        }
        let Some(prices) = aligned.prices.get(token.coin_id) else {
            continue;
        };
        match return_correlation(base_prices, prices) {
            Some(r) => {
                tracing::info!(
                    timeframe = timeframe.name,
                    pair = %pair_key(*token),
                    correlation = r,
                    "Computed correlation",
                );
                correlations.insert(pair_key(*token), r);
            }
            None => {
                tracing::warn!(
                    timeframe = timeframe.name,
                    pair = %pair_key(*token),
                    "Correlation undefined for pair, omitting",
                );
            }
        }
    }

    if correlations.is_empty() {
        // Keep the previous run's correlation file rather than
        // overwriting it with an empty object.
        tracing::warn!(
            timeframe = timeframe.name,
            "No defined correlations, leaving correlation file untouched",
        );
        return Ok(any_fetched);
    }

    let correlation_file = config.output_file(&format!("correlation_{}.json", timeframe.name));
    write_json(&correlation_file, &correlations, summary).await?;

    Ok(any_fetched)
}

/// Pretty-print `value` to `path` and record the file in the summary.
async fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    summary: &mut FetchSummary,
) -> Result<(), FetchError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| FetchError::Serialize {
        file: path.display().to_string(),
        source,
    })?;

    tokio::fs::write(path, json)
        .await
        .map_err(|source| FetchError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    summary.files_written.push(path.to_path_buf());
    Ok(())
}
