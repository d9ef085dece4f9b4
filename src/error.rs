//! Error types for the import pipeline.
//!
//! The taxonomy is deliberately small. Fetch problems are isolated to the
//! item that triggered them (a listing fetch is the one exception: it sinks
//! the whole batch for that date). A missing title makes a single article
//! unusable. Everything else the extractor can recover from locally by
//! substituting a default, so it never shows up here — an unparseable
//! publication date, an empty body, or a page with no categories all
//! produce a record anyway.

use thiserror::Error;

/// Errors surfaced by fetching, extraction, and persistence.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The HTTP request itself failed (network error, DNS, timeout).
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("unexpected status {status} fetching {url}")]
    FetchStatus { url: String, status: u16 },

    /// The article page has no top-level heading. A record without a title
    /// is meaningless, so the article is discarded.
    #[error("article page has no title heading")]
    MissingTitle,

    /// Sink-side file I/O failure.
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),

    /// Sink-side serialization failure.
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
