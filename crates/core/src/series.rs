//! Price series and UTC day-bucket alignment.
//!
//! CoinGecko returns daily candles with millisecond timestamps that can
//! drift by a few seconds between coins. Before correlating, every point
//! is bucketed to its UTC day and only days where *all* requested tokens
//! have a price are kept.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Milliseconds per UTC day; the alignment bucket width.
pub const MS_PER_DAY: i64 = 86_400_000;

/// A single observation in a raw price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Price in USD.
    pub price: f64,
}

/// Per-token price columns over a shared set of dates.
///
/// Serializes to the aligned output file:
/// `{"dates": ["2024-01-01", ...], "prices": {"bitcoin": [...], ...}}`.
/// `BTreeMap` keeps the per-token key order stable across runs so that
/// unchanged data produces byte-identical files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlignedSeries {
    pub dates: Vec<String>,
    pub prices: BTreeMap<String, Vec<f64>>,
}

impl AlignedSeries {
    /// Number of aligned days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no day was common to all tokens.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Floor a millisecond timestamp to the start of its UTC day.
pub fn day_bucket(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(MS_PER_DAY) * MS_PER_DAY
}

/// Format a day bucket as `YYYY-MM-DD`, or `None` if the timestamp is
/// outside the representable range.
pub fn bucket_date(bucket_ms: i64) -> Option<String> {
    DateTime::from_timestamp(bucket_ms / 1000, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Align raw per-token series on common UTC day buckets.
///
/// Keeps only buckets where every token in `series_by_token` has at
/// least one point; when a token has several points in one bucket the
/// last one wins. Buckets are emitted in ascending date order. An empty
/// input map yields an empty result (there is nothing to intersect).
pub fn align(series_by_token: &BTreeMap<String, Vec<PricePoint>>) -> AlignedSeries {
    if series_by_token.is_empty() {
        return AlignedSeries::default();
    }

    // bucket -> price, per token
    let mut bucketed: BTreeMap<&str, BTreeMap<i64, f64>> = BTreeMap::new();
    for (coin_id, points) in series_by_token {
        let map = bucketed.entry(coin_id.as_str()).or_default();
        for point in points {
            map.insert(day_bucket(point.timestamp), point.price);
        }
    }

    // Intersection of buckets across all tokens, in ascending order.
    let mut common: Vec<i64> = bucketed
        .values()
        .next()
        .map(|first| first.keys().copied().collect())
        .unwrap_or_default();
    common.retain(|bucket| bucketed.values().all(|map| map.contains_key(bucket)));

    let mut aligned = AlignedSeries::default();
    for coin_id in bucketed.keys() {
        aligned.prices.insert((*coin_id).to_string(), Vec::new());
    }

    for bucket in common {
        let Some(date) = bucket_date(bucket) else {
            tracing::warn!(bucket_ms = bucket, "Skipping unrepresentable day bucket");
            continue;
        };
        aligned.dates.push(date);
        for (coin_id, map) in &bucketed {
            // `common` only holds buckets present in every map.
            if let (Some(price), Some(column)) =
                (map.get(&bucket), aligned.prices.get_mut(*coin_id))
            {
                column.push(*price);
            }
        }
    }

    aligned
}
