mod app;
mod cart;
mod config;
mod logging;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::cart::CartStore;
use crate::logging::ReceiptLogger;
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config
    let mut cfg = config::load_config()?;

    if !logging::init_tracing(&cfg.logging) {
        eprintln!("warning: could not open log file {}", cfg.logging.log_file);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "smartcart starting");
    cfg.sanitize();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let store = CartStore::new(cfg.cart.tax_rate, cfg.cart.budget, cfg.ui.date_format.clone());
    let mut receipts = ReceiptLogger::new(&cfg.receipts);
    let tick_rate = Duration::from_millis(cfg.ui.tick_rate_ms);
    let mut state = AppState::new(cfg, store);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (status expiry)
    let tick_tx = event_tx;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;
    state.mark_rendered();

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        // Process actions
        for action in actions {
            match action {
                Action::LogReceipt { trip_id } => match state.store.trip(trip_id) {
                    Some(trip) => receipts.log_trip(trip),
                    None => warn!(%trip_id, "saved trip missing from history"),
                },
                Action::Quit => state.should_quit = true,
            }
        }

        if state.should_quit {
            info!("smartcart exiting");
            break;
        }

        // Conditional render (only on change)
        if state.needs_render() {
            terminal.draw(|f| ui::render(f, &state))?;
            state.mark_rendered();
        }
    }

    Ok(())
}
