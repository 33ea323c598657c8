//! Tracked token registry and correlation timeframes.
//!
//! The token set and timeframes are fixed: correlations are always
//! computed between the base token and every other tracked token, over
//! each timeframe, so the output file set is fully determined by these
//! tables.

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A tracked token: the CoinGecko coin ID plus its ticker symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// CoinGecko API coin ID, e.g. `"bitcoin"`. Also used in file names.
    pub coin_id: &'static str,
    /// Ticker symbol, e.g. `"BTC"`. Used in correlation pair keys.
    pub symbol: &'static str,
}

/// All tokens the pipeline fetches on every run.
pub const TRACKED_TOKENS: &[Token] = &[
    Token {
        coin_id: "bitcoin",
        symbol: "BTC",
    },
    Token {
        coin_id: "ethereum",
        symbol: "ETH",
    },
    Token {
        coin_id: "nillion",
        symbol: "NIL",
    },
    Token {
        coin_id: "mind-network",
        symbol: "MIND",
    },
];

/// The token every correlation is computed against.
pub const BASE_TOKEN: Token = Token {
    coin_id: "nillion",
    symbol: "NIL",
};

/// Look up a tracked token by its CoinGecko coin ID.
pub fn token_by_coin_id(coin_id: &str) -> Option<Token> {
    TRACKED_TOKENS.iter().copied().find(|t| t.coin_id == coin_id)
}

/// Key under which a base-vs-`other` correlation is stored in the
/// correlation output file, e.g. `"nil_btc"`.
pub fn pair_key(other: Token) -> String {
    format!(
        "{}_{}",
        BASE_TOKEN.symbol.to_lowercase(),
        other.symbol.to_lowercase()
    )
}

// ---------------------------------------------------------------------------
// Timeframes
// ---------------------------------------------------------------------------

/// A historical window over which series are fetched and correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    /// Short name used in output file names, e.g. `"30d"`.
    pub name: &'static str,
    /// Number of days of history to request.
    pub days: u32,
}

/// Timeframes processed on every run.
pub const TIMEFRAMES: &[Timeframe] = &[
    Timeframe {
        name: "30d",
        days: 30,
    },
    Timeframe {
        name: "90d",
        days: 90,
    },
];
