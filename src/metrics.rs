//! Fixed-point performance metrics codec.
//!
//! Every performance number crosses the ledger boundary as a scaled integer
//! (basis points / centi-percent), never as a float. This module converts
//! between those raw values, exact decimals, and the display strings shown
//! to users. Pure: no ledger types, no I/O.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Raw total return of 10000 means 0% (the baseline).
pub const TOTAL_RETURN_BASELINE: i64 = 10_000;

/// Total return is centi-percent around the baseline: 10500 -> +5.00%.
pub const TOTAL_RETURN_SCALE_DIGITS: u32 = 2;
/// Sharpe ratio is scaled by 10000: 15000 -> 1.50.
pub const SHARPE_SCALE_DIGITS: u32 = 4;
/// Max drawdown is centi-percent: 200 -> 2.00%.
pub const DRAWDOWN_SCALE_DIGITS: u32 = 2;
/// Win rate is centi-percent: 6000 -> 60.0%.
pub const WIN_RATE_SCALE_DIGITS: u32 = 2;

pub const DEFAULT_TOTAL_RETURN: i64 = TOTAL_RETURN_BASELINE;
pub const DEFAULT_SHARPE_RATIO: i64 = 0;
pub const DEFAULT_MAX_DRAWDOWN: i64 = 0;
pub const DEFAULT_WIN_RATE: i64 = 0;

/// Exact decimal for a scaled integer: `scaled_to_decimal(10500, 2) == 105.00`.
pub fn scaled_to_decimal(raw: i64, scale_digits: u32) -> Decimal {
    Decimal::new(raw, scale_digits)
}

/// Inverse of [`scaled_to_decimal`] at the same scale.
pub fn decimal_to_scaled(value: Decimal, scale_digits: u32) -> i64 {
    let factor = Decimal::from(10i64.pow(scale_digits));
    (value * factor).round().to_i64().unwrap_or(0)
}

/// Display total return relative to the 10000 baseline: 10500 -> "5.00%".
pub fn format_total_return(raw: i64) -> String {
    let pct = scaled_to_decimal(raw - TOTAL_RETURN_BASELINE, TOTAL_RETURN_SCALE_DIGITS);
    format!("{:.2}%", pct)
}

/// Display sharpe ratio: 15000 -> "1.50".
pub fn format_sharpe(raw: i64) -> String {
    format!("{:.2}", scaled_to_decimal(raw, SHARPE_SCALE_DIGITS))
}

/// Display max drawdown: 200 -> "2.00%".
pub fn format_drawdown(raw: i64) -> String {
    format!("{:.2}%", scaled_to_decimal(raw, DRAWDOWN_SCALE_DIGITS))
}

/// Display win rate with one decimal: 6000 -> "60.0%".
pub fn format_win_rate(raw: i64) -> String {
    format!("{:.1}%", scaled_to_decimal(raw, WIN_RATE_SCALE_DIGITS))
}

/// Parse a user-supplied scaled value. Non-numeric input yields `default`
/// so a partially filled form stays submittable.
pub fn parse_scaled(input: &str, default: i64) -> i64 {
    let trimmed = input.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return v;
    }
    // Decimal input like "10500.0" still counts as numeric
    trimmed
        .parse::<Decimal>()
        .ok()
        .and_then(|d| d.trunc().to_i64())
        .unwrap_or(default)
}

/// Parse a trades count, clamped to a minimum of 1. Zero trades is not a
/// valid verified state.
pub fn parse_trades_count(input: &str) -> u64 {
    input.trim().parse::<u64>().unwrap_or(1).max(1)
}
