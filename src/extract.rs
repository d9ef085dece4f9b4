//! Article page extraction.
//!
//! This module turns the raw HTML of one WikiNews article page into a
//! normalized [`ArticleRecord`]. Extraction is a pure function of the HTML
//! text and the injected clock value: identical input yields identical
//! output, which keeps the whole transformation trivially testable.
//!
//! The wiki markup is only loosely structured, so most of the work here is
//! policy: which sibling elements of the content container belong to the
//! body, where the page's real content ends, and how to read the editorial
//! state out of the markup. The rules live in [`extract_article`] and are
//! applied per child in a fixed priority order.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

use crate::error::{ImportError, Result};
use crate::models::{ArticleRecord, PubStatus};

/// Canonical base for full-resolution media files.
pub const MEDIA_BASE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/";

/// The publication marker's date format, e.g. `Tuesday, June 14, 2011`.
const PUBLISHED_DATE_FORMAT: &str = "%A, %B %d, %Y";

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static PUBLISHED: Lazy<Selector> = Lazy::new(|| Selector::parse(".published").unwrap());
static CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.mw-content-ltr").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse(".mw-headline").unwrap());
static THUMB_IMAGES: Lazy<Selector> = Lazy::new(|| Selector::parse("div.thumb img").unwrap());
static CATEGORY_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("#catlinks li a").unwrap());

/// Extract a normalized [`ArticleRecord`] from one article page.
///
/// `now` is the caller's clock reading; it becomes the publication date when
/// the page carries no parseable publication marker. A missing top-level
/// heading is the only hard failure — every other kind of sparse or
/// malformed markup degrades to an empty or defaulted field.
#[instrument(level = "debug", skip_all)]
pub fn extract_article(html: &str, now: NaiveDateTime) -> Result<ArticleRecord> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .ok_or(ImportError::MissingTitle)?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let published_date = published_date(&document).unwrap_or(now);
    let (body, status) = walk_body(&document);
    let images = thumbnail_images(&document);
    let categories = categories(&document);
    let summary = summary_of(&body);

    debug!(
        %title,
        status = status.code(),
        categories = categories.len(),
        images = images.len(),
        body_bytes = body.len(),
        "Extracted article"
    );

    Ok(ArticleRecord {
        title,
        published_date,
        status,
        body,
        categories,
        images,
        summary,
    })
}

/// Parse the publication marker, if the page has a usable one.
fn published_date(document: &Html) -> Option<NaiveDateTime> {
    let marker = document.select(&PUBLISHED).next()?;
    let text = marker.text().collect::<String>();
    match NaiveDate::parse_from_str(text.trim(), PUBLISHED_DATE_FORMAT) {
        Ok(date) => date.and_hms_opt(0, 0, 0),
        Err(e) => {
            warn!(text = %text.trim(), error = %e, "Unparseable publication marker; using current time");
            None
        }
    }
}

fn has_class(element: &ElementRef, name: &str) -> bool {
    element.value().classes().any(|c| c == name)
}

fn has_any_class(element: &ElementRef, names: &[&str]) -> bool {
    names.iter().any(|n| has_class(element, n))
}

/// Walk the children of the content container, building the body and the
/// draft/published classification in one pass.
///
/// Per child, in priority order:
/// 1. a `center` element is the footer call-to-action; nothing at or after
///    it belongs to the article,
/// 2. infobox, table-of-contents, and thumbnail elements are skipped,
/// 3. the first `metadata` element flips the article to draft; it and
///    everything collected before it are front-matter and are dropped, while
///    collection continues after it (later `metadata` elements are kept),
/// 4. `h2` elements are re-emitted with only their headline text so that
///    section edit links do not leak into the body; anything else is kept
///    verbatim.
fn walk_body(document: &Html) -> (String, PubStatus) {
    let mut status = PubStatus::Published;
    let mut parts: Vec<String> = Vec::new();

    let Some(content) = document.select(&CONTENT).next() else {
        return (String::new(), status);
    };

    for child in content.children().filter_map(ElementRef::wrap) {
        if child.value().name() == "center" {
            break;
        }
        if has_any_class(&child, &["infobox", "toc", "thumb", "thumbcaption"]) {
            continue;
        }
        if status == PubStatus::Published && has_class(&child, "metadata") {
            status = PubStatus::Draft;
            parts.clear();
            continue;
        }
        if child.value().name() == "h2" {
            let headline = child
                .select(&HEADLINE)
                .next()
                .map(|h| h.text().collect::<String>())
                .unwrap_or_default();
            parts.push(format!("<h2>{}</h2>", headline.trim()));
        } else {
            parts.push(child.html());
        }
    }

    (parts.join("\n").trim().to_string(), status)
}

/// Rewrite a thumbnail `src` into its full-resolution media URL.
///
/// The thumbnail path ends in a sized filename; the four path segments
/// preceding it identify the original file under the canonical media base.
pub fn rewrite_thumb_source(src: &str) -> Option<String> {
    let mut segments: Vec<&str> = src.split('/').collect();
    segments.pop()?;
    if segments.len() < 4 {
        return None;
    }
    let tail = segments[segments.len() - 4..].join("/");
    Some(format!("{MEDIA_BASE_URL}{tail}"))
}

fn thumbnail_images(document: &Html) -> Vec<String> {
    document
        .select(&THUMB_IMAGES)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(rewrite_thumb_source)
        .collect()
}

/// Category names from the category-links container.
///
/// Multi-word categories carry an underscore in their href and are
/// intentionally dropped; the rest keep only the text after the final colon.
fn categories(document: &Html) -> Vec<String> {
    use itertools::Itertools;

    document
        .select(&CATEGORY_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.contains('_'))
        .filter_map(|href| href.rsplit(':').next())
        .map(str::to_string)
        .unique()
        .collect()
}

/// The plain text of the body's third non-division child, or empty when the
/// body has fewer than three such children.
fn summary_of(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(body);
    let children: Vec<ElementRef> = fragment
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() != "div")
        .collect();
    match children.get(2) {
        Some(third) => third.text().collect::<String>().trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 28)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn page(content: &str) -> String {
        format!(
            r#"<html><body>
                 <h1>Example headline</h1>
                 <span class="published">Tuesday, June 14, 2011</span>
                 <div class="mw-content-ltr">{content}</div>
               </body></html>"#
        )
    }

    #[test]
    fn test_missing_title_is_fatal() {
        let html = r#"<html><body><div class="mw-content-ltr"><p>No heading here.</p></div></body></html>"#;
        let err = extract_article(html, clock()).unwrap_err();
        assert!(matches!(err, ImportError::MissingTitle));
    }

    #[test]
    fn test_title_and_published_date() {
        let record = extract_article(&page("<p>One.</p>"), clock()).unwrap();
        assert_eq!(record.title, "Example headline");
        assert_eq!(
            record.published_date,
            NaiveDate::from_ymd_opt(2011, 6, 14)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_missing_date_marker_falls_back_to_clock() {
        let html = r#"<html><body><h1>T</h1><div class="mw-content-ltr"><p>Hi.</p></div></body></html>"#;
        let record = extract_article(html, clock()).unwrap();
        assert_eq!(record.published_date, clock());
    }

    #[test]
    fn test_unparseable_date_marker_falls_back_to_clock() {
        let html = r#"<html><body><h1>T</h1>
            <span class="published">sometime last week</span>
            <div class="mw-content-ltr"><p>Hi.</p></div></body></html>"#;
        let record = extract_article(html, clock()).unwrap();
        assert_eq!(record.published_date, clock());
    }

    #[test]
    fn test_no_metadata_marker_means_published() {
        let record = extract_article(&page("<p>One.</p><p>Two.</p>"), clock()).unwrap();
        assert_eq!(record.status, PubStatus::Published);
    }

    #[test]
    fn test_footer_marker_truncates_everything_after() {
        let content = "<p>Kept.</p><center>Contribute!</center><p>Dropped.</p><p>Also dropped.</p>";
        let record = extract_article(&page(content), clock()).unwrap();
        assert!(record.body.contains("Kept."));
        assert!(!record.body.contains("Dropped."));
        assert!(!record.body.contains("Contribute!"));
    }

    #[test]
    fn test_infobox_toc_and_thumbs_are_skipped() {
        let content = r#"
            <div class="infobox">Box</div>
            <div class="toc">Contents</div>
            <div class="thumb tright"><img src="//u/x/thumb/a/b/c/120px-f.jpg"></div>
            <p>Article text.</p>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert!(record.body.contains("Article text."));
        assert!(!record.body.contains("Box"));
        assert!(!record.body.contains("Contents"));
        assert!(!record.body.contains("img"));
    }

    #[test]
    fn test_metadata_marker_sets_draft_and_drops_front_matter() {
        let content = r#"
            <p>Front matter.</p>
            <div class="metadata">Under review</div>
            <p>Real first paragraph.</p>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert_eq!(record.status, PubStatus::Draft);
        assert!(!record.body.contains("Front matter."));
        assert!(!record.body.contains("Under review"));
        assert!(record.body.contains("Real first paragraph."));
    }

    #[test]
    fn test_only_first_metadata_marker_has_effect() {
        let content = r#"
            <div class="metadata">Under review</div>
            <p>Body.</p>
            <div class="metadata">Second marker stays</div>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert_eq!(record.status, PubStatus::Draft);
        assert!(record.body.contains("Second marker stays"));
    }

    #[test]
    fn test_h2_is_rewritten_to_headline_text_only() {
        let content = r#"
            <p>Intro.</p>
            <h2><span class="mw-headline">Background</span><span class="editsection">[edit]</span></h2>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert!(record.body.contains("<h2>Background</h2>"));
        assert!(!record.body.contains("edit"));
    }

    #[test]
    fn test_thumbnail_src_rewrite() {
        assert_eq!(
            rewrite_thumb_source("//upload.example.org/a/b/c/d/120px-file.jpg").as_deref(),
            Some("https://upload.wikimedia.org/wikipedia/commons/a/b/c/d")
        );
        assert_eq!(rewrite_thumb_source("x/120px-file.jpg"), None);
    }

    #[test]
    fn test_images_collected_in_encounter_order() {
        let content = r#"
            <div class="thumb"><img src="//u/w/thumb/1/1a/First.jpg/200px-First.jpg"></div>
            <p>Text.</p>
            <div class="thumb"><img src="//u/w/thumb/2/2b/Second.jpg/200px-Second.jpg"></div>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert_eq!(
            record.images,
            vec![
                format!("{MEDIA_BASE_URL}thumb/1/1a/First.jpg"),
                format!("{MEDIA_BASE_URL}thumb/2/2b/Second.jpg"),
            ]
        );
    }

    #[test]
    fn test_categories_drop_multiword_and_strip_prefix() {
        let html = format!(
            r#"{}
            <div id="catlinks"><ul>
              <li><a href="/wiki/Category:Politics">Politics</a></li>
              <li><a href="/wiki/Category:United_States">United States</a></li>
              <li><a href="/wiki/Category:Europe">Europe</a></li>
              <li><a href="/wiki/Category:Politics">Politics</a></li>
            </ul></div>"#,
            page("<p>Hi.</p>")
        );
        let record = extract_article(&html, clock()).unwrap();
        assert_eq!(record.categories, vec!["Politics", "Europe"]);
    }

    #[test]
    fn test_summary_is_third_non_division_child() {
        let content = r#"
            <p>First.</p>
            <div class="quote">A division, not counted.</div>
            <p>Second.</p>
            <p>Third paragraph is the summary.</p>
            <p>Fourth.</p>
        "#;
        let record = extract_article(&page(content), clock()).unwrap();
        assert_eq!(record.summary, "Third paragraph is the summary.");
    }

    #[test]
    fn test_summary_empty_with_fewer_than_three_children() {
        let record = extract_article(&page("<p>One.</p><p>Two.</p>"), clock()).unwrap();
        assert_eq!(record.summary, "");
    }

    #[test]
    fn test_sparse_markup_degrades_to_empty_fields() {
        let html = "<html><body><h1>Only a title</h1></body></html>";
        let record = extract_article(html, clock()).unwrap();
        assert_eq!(record.body, "");
        assert_eq!(record.summary, "");
        assert!(record.categories.is_empty());
        assert!(record.images.is_empty());
        assert_eq!(record.status, PubStatus::Published);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = page(
            r#"<p>One.</p><div class="metadata">m</div><p>Two.</p>
               <div class="thumb"><img src="//u/w/thumb/1/1a/F.jpg/100px-F.jpg"></div>"#,
        );
        let a = extract_article(&html, clock()).unwrap();
        let b = extract_article(&html, clock()).unwrap();
        assert_eq!(a, b);
    }
}
