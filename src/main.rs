//! # WikiNews Import
//!
//! Imports recent WikiNews articles into normalized content-store records.
//! For each of the last N days the importer fetches that date's category
//! listing, filters out recap links and already-imported slugs, fetches the
//! remaining article pages concurrently, and extracts each one into a
//! normalized record: title, publication date, draft/published state, body
//! markup, categories, images, and a short summary.
//!
//! ## Usage
//!
//! ```sh
//! wikinews_import -o ./records --days 5
//! ```
//!
//! ## Architecture
//!
//! The pipeline takes its collaborators explicitly: a [`fetch::PageFetcher`]
//! for HTTP, a [`sink::RecordSink`] plus [`sink::SlugIndex`] for the content
//! store, and a clock reading the run is anchored to. `main` wires the real
//! implementations (reqwest, JSON files on disk) and a Ctrl-C cancellation
//! token around [`pipeline::run_import`].

use std::error::Error;

use chrono::Local;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod error;
mod extract;
mod fetch;
mod models;
mod pipeline;
mod scan;
mod sink;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use sink::JsonSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wikinews_import starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, args.days, %args.base_url, "Parsed CLI arguments");

    let base = match Url::parse(&args.base_url) {
        Ok(url) => url,
        Err(e) => {
            error!(base_url = %args.base_url, error = %e, "Invalid base URL");
            return Err(e.into());
        }
    };

    let fetcher = HttpFetcher::new()?;
    let sink = JsonSink::new(args.output_dir.clone());
    let known = sink.load_known_slugs().await?;

    // Ctrl-C stops the run between dates and aborts in-flight fetches.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received; cancelling import");
            signal_token.cancel();
        }
    });

    let now = Local::now().naive_local();
    let summary =
        pipeline::run_import(&fetcher, &sink, &known, &base, now, args.days, &cancel).await?;

    let elapsed = start_time.elapsed();
    info!(
        imported = summary.imported,
        skipped = summary.skipped_items,
        failed_batches = summary.failed_batches,
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}
