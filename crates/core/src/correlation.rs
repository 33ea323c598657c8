//! Pearson correlation of daily returns.
//!
//! Correlation is computed over simple daily returns rather than raw
//! prices, so two assets trending upward at different price levels do
//! not read as perfectly correlated. The coefficient is undefined
//! (`None`) when the series lengths differ, fewer than two prices are
//! available, or either return series has zero variance.

/// Simple period-over-period returns: `(p[i] - p[i-1]) / p[i-1]`.
///
/// A zero previous price would divide by zero; such steps are emitted
/// as `0.0` (a price of exactly zero is bad upstream data, not a real
/// infinite return).
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns `None` when the lengths differ, fewer than two observations
/// exist, or either sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Pearson correlation of the daily returns of two aligned price series.
///
/// `None` under the same conditions as [`pearson`], which in practice
/// means fewer than three aligned prices or a constant series.
pub fn return_correlation(prices_a: &[f64], prices_b: &[f64]) -> Option<f64> {
    if prices_a.len() != prices_b.len() || prices_a.len() < 2 {
        return None;
    }
    pearson(&daily_returns(prices_a), &daily_returns(prices_b))
}
