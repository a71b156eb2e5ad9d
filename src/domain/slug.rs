//! Slug derivation for content records.
//!
//! A slug is the lower-cased title with a fixed punctuation set removed,
//! truncated to its first four words and joined by hyphens. Uniqueness is a
//! persistence concern and is checked by the slug service, keeping the
//! derivation itself pure.

/// Characters dropped from a title before it is split into words.
pub const STRIPPED_PUNCTUATION: &[char] = &[
    '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '<', '>', ',', '.', '"', '\'',
];

/// Maximum number of title words kept in a slug.
pub const MAX_SLUG_WORDS: usize = 4;

const HTML_SUFFIX: &str = ".html";

/// Derive a slug from a human-readable title.
///
/// Titles made entirely of stripped punctuation and whitespace yield an empty
/// string; callers that persist slugs decide whether that is acceptable.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|ch| !STRIPPED_PUNCTUATION.contains(ch))
        .collect();

    cleaned
        .split_whitespace()
        .take(MAX_SLUG_WORDS)
        .collect::<Vec<_>>()
        .join("-")
}

/// Remove a trailing `.html` from a requested page name.
pub fn scrub_page_name(name: &str) -> &str {
    name.strip_suffix(HTML_SUFFIX).unwrap_or(name)
}
