//! Data models for scraped pages and their normalized representations.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`RawPage`]: one fetched page, consumed exactly once by extraction
//! - [`ArticleRecord`]: the normalized article produced by the extractor
//! - [`PubStatus`]: the two-state draft/published classification
//! - [`ImportedArticle`]: the persisted shape handed to the record sink
//!
//! All of these are plain value objects. An [`ArticleRecord`] is handed off
//! whole to the sink and never mutated afterward.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::slugify;

/// A raw page as returned by the fetcher, before any parsing.
#[derive(Debug)]
pub struct RawPage {
    /// The final URL of the page (after redirects).
    pub url: String,
    /// The HTTP status code.
    pub status: u16,
    /// The raw HTML text.
    pub text: String,
}

impl RawPage {
    /// Whether the fetch produced a usable page.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Publication state of an imported article.
///
/// `Draft` means the page carried an editorial metadata marker before any
/// footer marker; such articles are imported but held back from publication.
/// Serialized as the single-letter codes the content store expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PubStatus {
    #[serde(rename = "D")]
    Draft,
    #[serde(rename = "P")]
    Published,
}

impl PubStatus {
    /// The content-store status code: `"D"` or `"P"`.
    pub fn code(&self) -> &'static str {
        match self {
            PubStatus::Draft => "D",
            PubStatus::Published => "P",
        }
    }
}

/// A normalized article extracted from one WikiNews page.
///
/// # Invariants
///
/// * `body` excludes infobox, table-of-contents, and thumbnail elements,
///   everything at or after the footer call-to-action, and the metadata
///   marker itself.
/// * `categories` contains only single-word category names, each at most once,
///   in encounter order.
/// * `published_date` is never absent: when the page carries no parseable
///   publication marker, the extraction timestamp is substituted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The article headline, from the page's top-level heading.
    pub title: String,
    /// Publication date, or the extraction timestamp as a fallback.
    pub published_date: NaiveDateTime,
    /// Draft or published, derived from the body walk.
    pub status: PubStatus,
    /// The article body as an HTML fragment.
    pub body: String,
    /// Single-word category names, unique, in document order.
    pub categories: Vec<String>,
    /// Full-resolution image URLs, in encounter order.
    pub images: Vec<String>,
    /// Plain text of the third non-division body child, or empty.
    pub summary: String,
}

/// Placement of an image within an imported article.
///
/// The first image encountered is the lead art; every later one is
/// interstitial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    LeadArt,
    Interstitial,
}

/// An image attached to an imported article.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoredImage {
    pub url: String,
    pub role: ImageRole,
}

/// The persisted form of an article, as handed to the record sink.
///
/// This is the [`ArticleRecord`] plus the fields the persistence side
/// derives: the slug (from the trailing URL path segment) and the per-image
/// placement tags.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImportedArticle {
    pub title: String,
    pub slug: String,
    pub pub_status: PubStatus,
    pub body: String,
    pub pub_date: NaiveDateTime,
    pub summary: String,
    pub categories: Vec<String>,
    pub images: Vec<StoredImage>,
}

impl ImportedArticle {
    /// Assemble the persisted form from an extracted record and its URL.
    ///
    /// The slug is the normalized trailing path segment of the article URL.
    /// Images keep their encounter order; the first is tagged
    /// [`ImageRole::LeadArt`], the rest [`ImageRole::Interstitial`].
    pub fn assemble(url: &str, record: ArticleRecord) -> Self {
        let trailing = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(url);
        let images = record
            .images
            .into_iter()
            .enumerate()
            .map(|(i, url)| StoredImage {
                url,
                role: if i == 0 {
                    ImageRole::LeadArt
                } else {
                    ImageRole::Interstitial
                },
            })
            .collect();
        ImportedArticle {
            title: record.title,
            slug: slugify(trailing),
            pub_status: record.status,
            body: record.body,
            pub_date: record.published_date,
            summary: record.summary,
            categories: record.categories,
            images,
        }
    }
}
