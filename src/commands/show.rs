//! Print a single post

use anyhow::Result;

use super::reader;
use crate::content::MarkdownRenderer;
use crate::Folio;

pub async fn run(folio: &Folio, slug: &str, html: bool) -> Result<()> {
    let store = reader(folio)?;
    let snapshot = store.load_or_fallback().await?;

    let post = snapshot
        .find(slug)
        .ok_or_else(|| anyhow::anyhow!("No post with slug {:?}", slug))?;

    if html {
        let renderer = MarkdownRenderer::with_theme(&folio.config.highlight_theme);
        println!("{}", renderer.render(&post.content));
        return Ok(());
    }

    println!("{}", post.title);
    println!("Date: {}", post.date);
    if !post.tags.is_empty() {
        println!("Tags: {}", post.tags.join(", "));
    }
    println!("Excerpt: {}", post.summary());
    println!();
    println!("{}", post.content);

    Ok(())
}
