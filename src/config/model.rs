//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use crate::cart::store::{default_tax_rate, DEFAULT_DATE_FORMAT, MAX_AMOUNT, MIN_BUDGET};
use chrono::format::{Item, StrftimeItems};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cart: CartConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub receipts: ReceiptConfig,
}

impl AppConfig {
    /// Replace values the store and views cannot use with their defaults.
    pub fn sanitize(&mut self) {
        if self.cart.tax_rate < Decimal::ZERO || self.cart.tax_rate > Decimal::ONE_HUNDRED {
            warn!(tax_rate = %self.cart.tax_rate, "tax rate in config out of range, using default");
            self.cart.tax_rate = default_tax_rate();
        }
        let budget = self.cart.budget;
        if budget != Decimal::ZERO && (budget < MIN_BUDGET || budget > MAX_AMOUNT) {
            warn!(%budget, "budget in config out of range, budget disabled");
            self.cart.budget = Decimal::ZERO;
        }
        if !is_valid_date_format(&self.ui.date_format) {
            warn!(format = %self.ui.date_format, "invalid date format in config, using default");
            self.ui.date_format = default_date_format();
        }
        if self.ui.tick_rate_ms == 0 {
            self.ui.tick_rate_ms = default_tick_rate();
        }
    }
}

/// Initial values for the cart store. Read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// Sales tax in percent.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    /// Spending ceiling. Zero disables budget tracking.
    #[serde(default)]
    pub budget: Decimal,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            budget: Decimal::ZERO,
        }
    }
}

/// UI appearance and behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// chrono format string for trip dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

/// Diagnostic log settings. The TUI owns stdout, so logs always go to a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

/// Plain-text receipts written for every saved trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_receipt_dir")]
    pub dir: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_receipt_dir(),
        }
    }
}

fn is_valid_date_format(fmt: &str) -> bool {
    !fmt.is_empty() && StrftimeItems::new(fmt).all(|item| !matches!(item, Item::Error))
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_tick_rate() -> u64 {
    250
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    "~/.local/share/smartcart/smartcart.log".to_string()
}
fn default_receipt_dir() -> String {
    "~/.local/share/smartcart/receipts".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.cart.tax_rate, dec!(7.5));
        assert_eq!(cfg.cart.budget, Decimal::ZERO);
        assert_eq!(cfg.ui.date_format, "%b %-d, %Y");
        assert!(!cfg.receipts.enabled);
    }

    #[test]
    fn parses_numeric_and_string_amounts() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [cart]
            tax_rate = 8.25
            budget = "120.50"

            [receipts]
            enabled = true
            dir = "/tmp/receipts"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cart.tax_rate, dec!(8.25));
        assert_eq!(cfg.cart.budget, dec!(120.50));
        assert!(cfg.receipts.enabled);
        assert_eq!(cfg.receipts.dir, "/tmp/receipts");
        assert_eq!(cfg.ui.tick_rate_ms, 250);
    }

    #[test]
    fn sanitize_replaces_unusable_values() {
        let mut cfg = AppConfig::default();
        cfg.cart.tax_rate = dec!(-1);
        cfg.cart.budget = dec!(-10);
        cfg.ui.date_format = "%Q".into();
        cfg.ui.tick_rate_ms = 0;
        cfg.sanitize();
        assert_eq!(cfg.cart.tax_rate, dec!(7.5));
        assert_eq!(cfg.cart.budget, Decimal::ZERO);
        assert_eq!(cfg.ui.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(cfg.ui.tick_rate_ms, 250);

        cfg.cart.tax_rate = dec!(250);
        cfg.cart.budget = Decimal::MAX;
        cfg.sanitize();
        assert_eq!(cfg.cart.tax_rate, dec!(7.5));
        assert_eq!(cfg.cart.budget, Decimal::ZERO);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.cart.budget = dec!(60);
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.cart.budget, dec!(60));
        assert_eq!(back.cart.tax_rate, dec!(7.5));
    }
}
