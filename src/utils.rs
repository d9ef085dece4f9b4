//! Small helpers shared across the pipeline.

/// Normalize a URL path segment or category name into a content-store slug.
///
/// Lowercases the text, removes characters that are not alphanumeric,
/// whitespace, hyphens, or underscores, and replaces spaces with hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Some_Article_Title"), "some_article_title");
/// assert_eq!(slugify("Hello World"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .replace(
            |c: char| !c.is_alphanumeric() && c != ' ' && c != '-' && c != '_',
            "",
        )
        .replace(' ', "-")
}
