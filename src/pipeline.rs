//! Import orchestration.
//!
//! One run walks backward from the reference date, one listing page per
//! day. Each day's batch is: fetch the listing, scan it for new article
//! URLs, fetch those pages concurrently (bounded), extract inline on each
//! success, then fan in and hand the finished records to the sink.
//!
//! Failure isolation follows the listing/article split: a failed or
//! non-success listing fetch sinks that whole date's batch (it is counted
//! and the run moves on to the next date), while a failed article fetch or
//! extraction only costs that one article.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::error::{ImportError, Result};
use crate::extract::extract_article;
use crate::fetch::PageFetcher;
use crate::models::{ArticleRecord, ImportedArticle};
use crate::scan::{category_url, scan_category_page};
use crate::sink::{RecordSink, SlugIndex};

/// Bound on simultaneous in-flight article fetches.
const CONCURRENT_FETCHES: usize = 8;

/// Counts reported at the end of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Articles extracted and persisted.
    pub imported: usize,
    /// Articles dropped by a per-item fetch or extraction failure.
    pub skipped_items: usize,
    /// Dates whose listing page could not be processed at all.
    pub failed_batches: usize,
}

/// Import every new article from the last `days` daily listings.
///
/// All collaborators are explicit: the fetcher, the sink, the known-slug
/// index, and the clock reading the run is anchored to. `cancel` stops the
/// run between dates and aborts in-flight article fetches; an aborted fetch
/// never produces a partial record.
#[instrument(level = "info", skip_all, fields(days))]
pub async fn run_import<F, S, I>(
    fetcher: &F,
    sink: &S,
    index: &I,
    base: &Url,
    now: NaiveDateTime,
    days: u32,
    cancel: &CancellationToken,
) -> Result<ImportSummary>
where
    F: PageFetcher,
    S: RecordSink,
    I: SlugIndex,
{
    let mut summary = ImportSummary::default();
    for offset in 0..days {
        if cancel.is_cancelled() {
            warn!(remaining = days - offset, "Cancelled; stopping before remaining dates");
            break;
        }
        let date = (now - Duration::days(offset as i64)).date();
        match import_day(fetcher, sink, index, base, date, now, cancel).await {
            Ok((imported, skipped)) => {
                summary.imported += imported;
                summary.skipped_items += skipped;
            }
            Err(e) => {
                error!(%date, error = %e, "Listing batch failed; continuing with remaining dates");
                summary.failed_batches += 1;
            }
        }
    }
    info!(
        imported = summary.imported,
        skipped = summary.skipped_items,
        failed_batches = summary.failed_batches,
        "Import run complete"
    );
    Ok(summary)
}

/// Process one date's listing. Returns `(imported, skipped)` counts.
#[instrument(level = "info", skip_all, fields(%date))]
async fn import_day<F, S, I>(
    fetcher: &F,
    sink: &S,
    index: &I,
    base: &Url,
    date: NaiveDate,
    now: NaiveDateTime,
    cancel: &CancellationToken,
) -> Result<(usize, usize)>
where
    F: PageFetcher,
    S: RecordSink,
    I: SlugIndex,
{
    let listing_url = category_url(base, date);
    let listing = fetcher.fetch(&listing_url).await?;
    if !listing.is_success() {
        return Err(ImportError::FetchStatus {
            url: listing_url,
            status: listing.status,
        });
    }

    let urls = scan_category_page(base, &listing.text, index);
    let total = urls.len();
    info!(count = total, "Scanned listing page");

    // Fetch concurrently, extract inline on each success, fan in before the
    // sink sees anything.
    let records: Vec<(String, ArticleRecord)> = stream::iter(urls)
        .map(|url| async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(%url, "Cancelled in flight; dropping article");
                    None
                }
                fetched = fetcher.fetch(&url) => match fetched {
                    Ok(page) if page.is_success() => match extract_article(&page.text, now) {
                        Ok(record) => Some((page.url, record)),
                        Err(e) => {
                            warn!(%url, error = %e, "Extraction failed; skipping article");
                            None
                        }
                    },
                    Ok(page) => {
                        warn!(%url, status = page.status, "Non-success status; skipping article");
                        None
                    }
                    Err(e) => {
                        error!(%url, error = %e, "Fetch failed; skipping article");
                        None
                    }
                }
            }
        })
        .buffer_unordered(CONCURRENT_FETCHES)
        .filter_map(std::future::ready)
        .collect()
        .await;

    let imported = records.len();
    for (url, record) in records {
        sink.persist(&ImportedArticle::assemble(&url, record)).await?;
    }
    info!(imported, skipped = total - imported, "Imported day's batch");
    Ok((imported, total - imported))
}
