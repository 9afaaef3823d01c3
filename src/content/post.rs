//! Post model

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of body characters used when a post has no excerpt
pub const EXCERPT_LENGTH: usize = 150;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Slug (URL-friendly name), derived from the title
    pub slug: String,

    /// Publication date, as written in the document (ISO 8601)
    pub date: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Excerpt from front-matter, empty when absent
    pub excerpt: String,

    /// Raw markdown body, front-matter stripped
    pub content: String,

    /// File name in the backing source (`<slug>.md` by convention)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Opaque version token of the stored file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl Post {
    /// Create a new, unsaved post
    pub fn new(title: impl Into<String>, date: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: super::slugify(&title),
            title,
            date: date.into(),
            tags: Vec::new(),
            excerpt: String::new(),
            content: content.into(),
            filename: None,
            revision: None,
        }
    }

    /// File name this post is stored under by default
    pub fn default_filename(&self) -> String {
        format!("{}.md", self.slug)
    }

    /// Re-derive the slug after the title changed
    pub fn retitle(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = super::slugify(&self.title);
    }

    /// Parse the date string into a timestamp
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_date_string(&self.date)
    }

    /// Excerpt for listings: the front-matter excerpt, or the start of the body
    pub fn summary(&self) -> String {
        if !self.excerpt.trim().is_empty() {
            return self.excerpt.clone();
        }

        let body = self.content.trim();
        if body.chars().count() > EXCERPT_LENGTH {
            let cut: String = body.chars().take(EXCERPT_LENGTH).collect();
            format!("{}...", cut.trim_end())
        } else {
            body.to_string()
        }
    }
}

/// Render a timestamp the way new posts store their date
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
