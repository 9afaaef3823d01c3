//! Slug generation

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum slug length in characters
pub const MAX_SLUG_LENGTH: usize = 50;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DASHES: Regex = Regex::new(r"-+").unwrap();
}

/// Turn a title into a URL-safe slug.
///
/// Only `[a-z0-9-]` survives, whitespace becomes `-`, dash runs collapse, and
/// the result never starts or ends with `-` nor exceeds [`MAX_SLUG_LENGTH`].
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(&kept, "-");
    let collapsed = DASHES.replace_all(&dashed, "-");
    let trimmed = collapsed.trim_matches('-');

    // Everything left is ASCII, so byte length equals char count
    let clamped = if trimmed.len() > MAX_SLUG_LENGTH {
        &trimmed[..MAX_SLUG_LENGTH]
    } else {
        trimmed
    };

    clamped.trim_end_matches('-').to_string()
}
