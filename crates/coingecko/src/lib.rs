//! `corrtrack-coingecko` -- CoinGecko REST API client.
//!
//! Wraps the public `market_chart` endpoint behind the [`PriceSource`]
//! trait the fetch stage consumes, so tests can substitute a canned
//! source for the live API.

pub mod client;
pub mod models;
pub mod source;

pub use client::{CoinGeckoClient, CoinGeckoError};
pub use source::{PriceSource, SourceError};
