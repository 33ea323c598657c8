//! The price source seam between the fetch stage and the live API.

use async_trait::async_trait;

use crate::client::{CoinGeckoClient, CoinGeckoError};
use corrtrack_core::series::PricePoint;

/// Errors a price source can report for a single coin fetch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    CoinGecko(#[from] CoinGeckoError),

    /// Failure from a non-CoinGecko source (fakes, future providers).
    #[error("price source failure: {0}")]
    Other(String),
}

/// Provider of daily historical prices for one coin.
///
/// The fetch stage only depends on this trait; tests drive it with a
/// canned implementation instead of the live API.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch `days` of daily USD prices for `coin_id`, oldest first.
    async fn fetch_daily(&self, coin_id: &str, days: u32) -> Result<Vec<PricePoint>, SourceError>;
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_daily(&self, coin_id: &str, days: u32) -> Result<Vec<PricePoint>, SourceError> {
        Ok(self.market_chart(coin_id, days).await?)
    }
}
