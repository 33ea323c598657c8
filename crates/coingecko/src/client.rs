//! HTTP client for the CoinGecko REST API.
//!
//! The free CoinGecko tier rate-limits hard, so the client sleeps for a
//! configurable delay before every request rather than retrying after
//! a 429.

use std::time::Duration;

use crate::models::MarketChart;
use corrtrack_core::series::PricePoint;

/// Per-request timeout for the CoinGecko API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the CoinGecko REST API.
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

/// Errors from the CoinGecko API layer.
#[derive(Debug, thiserror::Error)]
pub enum CoinGeckoError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// CoinGecko returned a non-2xx status code.
    #[error("CoinGecko API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl CoinGeckoClient {
    /// Create a client against `base_url`, e.g.
    /// `https://api.coingecko.com/api/v3`, sleeping `request_delay`
    /// before each request.
    pub fn new(base_url: String, request_delay: Duration) -> Result<Self, CoinGeckoError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            request_delay,
        })
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `days` of daily USD prices for one coin.
    ///
    /// Sends `GET /coins/{coin_id}/market_chart` with
    /// `vs_currency=usd&interval=daily` after the configured delay.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, CoinGeckoError> {
        if !self.request_delay.is_zero() {
            tracing::debug!(
                coin_id,
                delay_secs = self.request_delay.as_secs(),
                "Sleeping before CoinGecko request",
            );
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let response = self
            .client
            .get(url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", &days.to_string()),
                ("interval", "daily"),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let chart = response.json::<MarketChart>().await?;
        let points = chart.into_points();

        tracing::debug!(coin_id, days, point_count = points.len(), "Fetched market chart");
        Ok(points)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`CoinGeckoError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CoinGeckoError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CoinGeckoError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
