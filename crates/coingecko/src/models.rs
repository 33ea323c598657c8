//! Response models for the CoinGecko `market_chart` endpoint.

use corrtrack_core::series::PricePoint;
use serde::Deserialize;

/// Body of `GET /coins/{id}/market_chart`.
///
/// CoinGecko also returns `market_caps` and `total_volumes` in the same
/// shape; only `prices` is consumed here.
#[derive(Debug, Deserialize)]
pub struct MarketChart {
    /// `[timestamp_ms, price_usd]` pairs, one per interval.
    pub prices: Vec<PricePair>,
}

/// A single `[timestamp_ms, price_usd]` array element.
///
/// Timestamps are integral milliseconds but arrive as JSON numbers, so
/// both components deserialize as `f64`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PricePair(pub f64, pub f64);

impl MarketChart {
    /// Convert the raw pair list into the domain price series.
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .map(|PricePair(timestamp, price)| PricePoint {
                timestamp: timestamp as i64,
                price,
            })
            .collect()
    }
}
