//! `corrtrack-core` -- domain types and pure logic for the correlation
//! data pipeline.
//!
//! Contains no I/O: the token registry, timeframe definitions, price
//! series alignment, the Pearson correlation of daily returns, and the
//! environment-driven pipeline configuration. Everything that touches
//! the network or the filesystem lives in the `coingecko` and
//! `pipeline` crates.

pub mod config;
pub mod correlation;
pub mod series;
pub mod token;
