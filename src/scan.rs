//! Category listing scanner.
//!
//! WikiNews publishes one category page per calendar date listing every
//! article published that day. This module turns one such listing into the
//! set of article URLs worth fetching: it walks the anchors of the primary
//! content container in document order, throws away daily-recap aggregator
//! links and articles the content store already holds, and resolves the
//! rest against the site base.
//!
//! # URL Pattern
//!
//! Listing pages live at `https://en.wikinews.org/wiki/Category:June_14,_2011`
//! (month name, unpadded day). Recap links end in a date path such as
//! `/2011/june/14` and are not genuine articles.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::sink::SlugIndex;

static RECAP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}/\w+/\d{1,2}$").unwrap()
});

static LISTING_ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.mw-content-ltr li a").unwrap());

/// Whether an href points at a daily-recap aggregator page.
///
/// Recap links masquerade as articles in the listing but their trailing path
/// is a date: a 4-digit year, a month name, and a 1-2 digit day, anchored at
/// the end of the href.
pub fn is_recap_post(href: &str) -> bool {
    RECAP_RE.is_match(href)
}

/// Build the listing URL for one calendar date.
///
/// The category name is the date spelled out the way the wiki titles its
/// per-day categories: `June_14,_2011`.
pub fn category_url(base: &Url, date: NaiveDate) -> String {
    let category = format!("{}_{},_{}", date.format("%B"), date.day(), date.year());
    format!("{}/wiki/Category:{}", base.as_str().trim_end_matches('/'), urlencoding::encode(&category))
}

/// Scan one listing page for new article URLs.
///
/// Every anchor under the primary link container is visited in document
/// order. An anchor is dropped when it is a recap link or when its
/// provisional slug (the final path segment of the href) is already known to
/// the store; everything else is emitted as an absolute URL. No further
/// de-duplication happens here: repeated anchors to the same new article are
/// each emitted.
#[instrument(level = "debug", skip_all)]
pub fn scan_category_page(base: &Url, html: &str, index: &impl SlugIndex) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut urls = Vec::new();
    for anchor in document.select(&LISTING_ANCHORS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if is_recap_post(href) {
            debug!(%href, "Skipping recap link");
            continue;
        }
        let slug = href.rsplit('/').next().unwrap_or(href);
        if index.is_known(slug) {
            debug!(%slug, "Skipping already-imported article");
            continue;
        }
        if let Ok(resolved) = base.join(href) {
            urls.push(resolved.to_string());
        }
    }
    urls
}
