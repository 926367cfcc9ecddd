use chrono::Local;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to 2 decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Today's date in the local timezone, ISO-8601 (`YYYY-MM-DD`).
pub fn today_iso() -> String {
    Local::now().date_naive().to_string()
}
