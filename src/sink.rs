//! Persistence collaborators.
//!
//! The pipeline hands finished records to a [`RecordSink`] and asks a
//! [`SlugIndex`] which articles the store already holds; both are traits so
//! the content store stays out of the core. The shipped implementation,
//! [`JsonSink`], writes one JSON file per article under a date directory:
//!
//! ```text
//! output_dir/
//! └── 2011-06-14/
//!     ├── mercury_completes_first_orbit.json
//!     └── asteroid_2011_md_passes_earth.json
//! ```
//!
//! File stems double as the known-slug index for later runs.

use std::collections::HashSet;

use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::ImportedArticle;

/// Query side of the content store: which slugs are already imported?
pub trait SlugIndex {
    fn is_known(&self, slug: &str) -> bool;
}

impl SlugIndex for HashSet<String> {
    fn is_known(&self, slug: &str) -> bool {
        self.contains(slug)
    }
}

/// Write side of the content store.
pub trait RecordSink {
    /// Persist one finished article. Called only after the whole batch has
    /// fanned in; a record is never handed over partially built.
    async fn persist(&self, article: &ImportedArticle) -> Result<()>;
}

/// Sink that writes each article as `{output_dir}/{pub_date}/{slug}.json`.
#[derive(Debug, Clone)]
pub struct JsonSink {
    output_dir: String,
}

impl JsonSink {
    pub fn new(output_dir: impl Into<String>) -> Self {
        JsonSink {
            output_dir: output_dir.into(),
        }
    }

    /// Collect the slugs of every article already written under the output
    /// directory. Used to seed the known-slug index so re-runs skip work.
    #[instrument(level = "info", skip_all, fields(output_dir = %self.output_dir))]
    pub async fn load_known_slugs(&self) -> Result<HashSet<String>> {
        let mut known = HashSet::new();
        let mut dates = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            // A missing output dir just means nothing was imported yet.
            Err(_) => return Ok(known),
        };
        while let Some(date_dir) = dates.next_entry().await? {
            if !date_dir.file_type().await?.is_dir() {
                continue;
            }
            let mut files = fs::read_dir(date_dir.path()).await?;
            while let Some(file) = files.next_entry().await? {
                let path = file.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        known.insert(stem.to_string());
                    }
                }
            }
        }
        info!(count = known.len(), "Loaded known slugs");
        Ok(known)
    }
}

impl RecordSink for JsonSink {
    #[instrument(level = "debug", skip_all, fields(slug = %article.slug))]
    async fn persist(&self, article: &ImportedArticle) -> Result<()> {
        let dir = format!("{}/{}", self.output_dir, article.pub_date.date());
        fs::create_dir_all(&dir).await?;
        let path = format!("{}/{}.json", dir, article.slug);
        let json = serde_json::to_string(article)?;
        fs::write(&path, json).await?;
        debug!(%path, "Wrote article record");
        Ok(())
    }
}
