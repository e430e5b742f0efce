//! Display formatting for amounts, rates and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

/// `$7.53` style, two decimals, half away from zero.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

/// Tax rates print without trailing zeros: `7.5`, `8`, `6.25`.
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

/// Whole-number percentage for the budget bar: `75%`.
pub fn format_percent(pct: Decimal) -> String {
    let rounded = pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", rounded.normalize())
}
