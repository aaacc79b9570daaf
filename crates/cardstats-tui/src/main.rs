//! `cardstats-tui` — terminal client for browsing tournament statistics.
//!
//! Four screens backed by the `cardstats-core` data layer: Hall of Fame,
//! Popular Cards, and drill-down views for a single player or round. Card
//! names resolve to preview image URLs through the shared
//! [`CardImageResolver`](cardstats_core::CardImageResolver), so repeat
//! lookups never touch the network twice.
//!
//! Logs are written to a file (default `/tmp/cardstats-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cardstats_api::{CardLookupClient, StatsClient};
use cardstats_core::{CardImageResolver, ImageStore};

use crate::app::App;

/// Terminal client for tournament statistics.
#[derive(Parser, Debug)]
#[command(name = "cardstats-tui", version, about)]
struct Cli {
    /// Statistics backend URL (e.g., http://127.0.0.1:5000/)
    #[arg(short = 'u', long, env = "CARDSTATS_STATS_URL")]
    stats_url: Option<String>,

    /// Log file path (defaults to /tmp/cardstats-tui.log)
    #[arg(long, default_value = "/tmp/cardstats-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cardstats={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("cardstats-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let mut config = cardstats_config::load_config()?;
    if let Some(url) = cli.stats_url {
        config.stats_url = url;
    }

    info!(stats_url = %config.stats_url, "starting cardstats-tui");

    let transport = config.transport();
    let stats = StatsClient::new(&config.stats_url, &transport)?;
    let lookup = CardLookupClient::new(&config.card_provider_url, &transport)?;

    let store = match config.cache_file() {
        Some(path) => ImageStore::open(path, config.cache.capacity),
        None => ImageStore::in_memory(config.cache.capacity),
    };
    let resolver = Arc::new(CardImageResolver::new(lookup, store, config.image_size()?));

    let mut app = App::new(stats, resolver);
    app.run().await?;

    Ok(())
}
