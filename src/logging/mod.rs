//! Diagnostics and receipt logging to disk.
//!
//! Diagnostics go through `tracing` into a single log file, since the
//! terminal belongs to the UI. Receipts are plain-text copies of saved trips,
//! appended to daily files named `receipts_<date>.log` in the configured
//! directory (default: `~/.local/share/smartcart/receipts/`). Receipts are
//! never read back.

use crate::cart::money::{format_money, format_rate};
use crate::cart::ShoppingTrip;
use crate::config::{expand_home, LoggingConfig, ReceiptConfig};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber writing to the configured file.
///
/// Returns `false` (and installs nothing) when the file cannot be opened;
/// the application keeps running without diagnostics.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let path = expand_home(&config.log_file);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}

/// Appends a receipt for each saved trip to a daily file.
///
/// File handles are cached for the lifetime of the logger to avoid repeated
/// opens. A file that cannot be opened is reported once and skipped.
pub struct ReceiptLogger {
    enabled: bool,
    dir: PathBuf,
    file_handles: HashMap<String, Option<fs::File>>,
}

impl ReceiptLogger {
    pub fn new(config: &ReceiptConfig) -> Self {
        Self {
            enabled: config.enabled,
            dir: expand_home(&config.dir),
            file_handles: HashMap::new(),
        }
    }

    /// Write `trip` to the receipt file for the day it was saved. No-op when
    /// receipts are disabled.
    pub fn log_trip(&mut self, trip: &ShoppingTrip) {
        if !self.enabled {
            return;
        }

        let date = trip.saved_on.format("%Y-%m-%d").to_string();
        let filename = format!("receipts_{}.log", date);
        let filepath = self.dir.join(&filename);
        let dir = self.dir.clone();

        let handle = self.file_handles.entry(filename).or_insert_with(|| {
            let _ = fs::create_dir_all(&dir);
            match OpenOptions::new().create(true).append(true).open(&filepath) {
                Ok(f) => Some(f),
                Err(e) => {
                    warn!(path = %filepath.display(), error = %e, "cannot open receipt file");
                    None
                }
            }
        });

        if let Some(file) = handle {
            if let Err(e) = file.write_all(format_receipt(trip).as_bytes()) {
                warn!(error = %e, "failed to write receipt");
            }
        }
    }
}

/// Render a trip as a fixed-width text receipt.
pub fn format_receipt(trip: &ShoppingTrip) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ({}) ===\n", trip.date, trip.id));
    for item in &trip.items {
        out.push_str(&format!(
            "{:<24} {:>9} x {:<4} {:>10}\n",
            truncate(&item.name, 24),
            format_money(item.price),
            item.quantity,
            format_money(item.total)
        ));
    }
    out.push_str(&format!("{:<40} {:>10}\n", "Subtotal:", format_money(trip.subtotal)));
    out.push_str(&format!(
        "{:<40} {:>10}\n",
        format!("Tax ({}%):", format_rate(trip.tax_rate)),
        format_money(trip.tax)
    ));
    out.push_str(&format!("{:<40} {:>10}\n\n", "Total:", format_money(trip.total)));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
