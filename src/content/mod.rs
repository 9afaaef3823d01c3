//! Content module - posts, front-matter and markdown rendering

pub mod frontmatter;
mod markdown;
mod post;
mod slug;

pub use frontmatter::{decode, encode, FrontMatter};
pub use markdown::{html_escape, MarkdownRenderer};
pub use post::{format_timestamp, parse_date_string, Post, EXCERPT_LENGTH};
pub use slug::{slugify, MAX_SLUG_LENGTH};
