//! Front-matter parsing and generation
//!
//! Posts carry a small metadata block between two `---` lines. Fields are
//! extracted leniently with regular expressions rather than a full YAML
//! parser, and written back in one fixed layout:
//!
//! ```text
//! ---
//! title: "Hello World"
//! date: "2025-08-16T10:00:00.000Z"
//! tags: ["intro", "welcome"]
//! excerpt: "A first post"
//! ---
//!
//! Body text.
//! ```

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::post::format_timestamp;
use super::{slugify, Post};

lazy_static! {
    static ref TITLE: Regex = Regex::new(r#"title:\s*"([^"]+)""#).unwrap();
    static ref DATE: Regex = Regex::new(r#"date:\s*"([^"]+)""#).unwrap();
    static ref EXCERPT: Regex = Regex::new(r#"excerpt:\s*"([^"]+)""#).unwrap();
    static ref TAGS: Regex = Regex::new(r"tags:\s*\[([^\]]+)\]").unwrap();
}

const DELIMITER: &str = "---";

/// Front-matter fields found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Without two delimiter lines the whole input is the body.
    pub fn parse(content: &str) -> (Self, String) {
        let lines: Vec<&str> = content.lines().collect();
        let mut delimiters = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim() == DELIMITER)
            .map(|(i, _)| i);

        let (start, end) = match (delimiters.next(), delimiters.next()) {
            (Some(start), Some(end)) => (start, end),
            _ => return (FrontMatter::default(), content.to_string()),
        };

        let block = lines[start + 1..end].join("\n");
        let body = lines[end + 1..].join("\n").trim().to_string();

        (Self::parse_block(&block), body)
    }

    fn parse_block(block: &str) -> Self {
        let capture = |re: &Regex| {
            re.captures(block)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };

        let tags = TAGS
            .captures(block)
            .and_then(|c| c.get(1))
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|tag| tag.trim().replace('"', ""))
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: capture(&TITLE),
            date: capture(&DATE),
            tags,
            excerpt: capture(&EXCERPT),
        }
    }

    /// Render the metadata of a post as a front-matter block.
    ///
    /// Values are written between double quotes without escaping, so a value
    /// that itself contains `"` will not read back intact.
    pub fn render(post: &Post) -> String {
        let tags = post
            .tags
            .iter()
            .map(|tag| format!("\"{}\"", tag))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{d}\ntitle: \"{}\"\ndate: \"{}\"\ntags: [{}]\nexcerpt: \"{}\"\n{d}\n",
            post.title,
            post.date,
            tags,
            post.excerpt,
            d = DELIMITER
        )
    }
}

/// Decode a markdown document into a post.
///
/// `filename` supplies the title when the document has none, and `now` the
/// date. The slug is always derived from the resolved title.
pub fn decode(raw: &str, filename: &str, now: DateTime<Utc>) -> Post {
    let (fm, body) = FrontMatter::parse(raw);

    let title = fm.title.unwrap_or_else(|| title_from_filename(filename));
    let date = fm.date.unwrap_or_else(|| format_timestamp(&now));

    Post {
        slug: slugify(&title),
        title,
        date,
        tags: fm.tags,
        excerpt: fm.excerpt.unwrap_or_default(),
        content: body,
        filename: None,
        revision: None,
    }
}

/// Encode a post as a markdown document with front-matter
pub fn encode(post: &Post) -> String {
    format!("{}\n{}", FrontMatter::render(post), post.content)
}

fn title_from_filename(filename: &str) -> String {
    filename
        .strip_suffix(".md")
        .unwrap_or(filename)
        .replace('-', " ")
}
