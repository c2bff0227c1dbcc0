//! Deterministic storage paths for imported articles.
//!
//! Format: `YYYY/MM/DD/<slug>.md`

use chrono::{Datelike, Local, NaiveDate};

use crate::settings::PathSettings;

/// Normalize a title into a path slug.
///
/// Lowercases, collapses whitespace runs into `-`, then drops anything outside
/// `[a-z0-9-_]`. May return an empty string.
pub fn slugify(title: &str) -> String {
    title
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect()
}

/// Whitespace as web clients count it: Unicode `White_Space` plus the BOM,
/// minus NEL (U+0085).
fn is_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Build the storage path for `title` on a given date.
pub fn derive_path_on(title: Option<&str>, date: NaiveDate, fallback_slug: &str) -> String {
    let slug = title.map(slugify).filter(|s| !s.is_empty());
    format!(
        "{:04}/{:02}/{:02}/{}.md",
        date.year(),
        date.month(),
        date.day(),
        slug.as_deref().unwrap_or(fallback_slug)
    )
}

/// Build the storage path for `title` using today's local date.
pub fn derive_path(title: Option<&str>, settings: &PathSettings) -> String {
    derive_path_on(title, Local::now().date_naive(), &settings.fallback_slug)
}
