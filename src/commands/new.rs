//! Create a new post

use anyhow::Result;
use chrono::Utc;

use super::Editor;
use crate::content::{format_timestamp, Post};
use crate::Folio;

/// Fields of a post about to be created
#[derive(Debug, Default, Clone)]
pub struct Draft {
    pub title: String,
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
    pub body: String,
}

impl Draft {
    /// Turn the draft into a post dated now
    pub fn into_post(self) -> Result<Post> {
        let title = self.title.trim();
        if title.is_empty() {
            anyhow::bail!("Please enter a title");
        }

        let mut post = Post::new(title, format_timestamp(&Utc::now()), self.body.trim());
        if post.slug.is_empty() {
            anyhow::bail!("Title {:?} has no letters or digits to build a slug from", title);
        }
        post.tags = self.tags;
        post.excerpt = self.excerpt.unwrap_or_default();
        Ok(post)
    }
}

/// Create a post in the configured source
pub async fn create_post(folio: &Folio, draft: Draft) -> Result<Post> {
    let editor = Editor::open(folio)?;
    let post = draft.into_post()?;

    if editor.store.get_by_slug(&post.slug).await?.is_some() {
        anyhow::bail!("A post with slug {:?} already exists", post.slug);
    }

    let saved = editor
        .sink
        .save(&post, true, editor.token.as_deref())
        .await?;
    editor.store.invalidate_cache().await;

    println!(
        "Created: {} [{}]",
        saved.title,
        saved.filename.as_deref().unwrap_or(&saved.slug)
    );
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_into_post() {
        let draft = Draft {
            title: "  My New Post ".to_string(),
            tags: vec!["rust".to_string()],
            excerpt: None,
            body: "\nBody\n".to_string(),
        };
        let post = draft.into_post().unwrap();
        assert_eq!(post.title, "My New Post");
        assert_eq!(post.slug, "my-new-post");
        assert_eq!(post.content, "Body");
        assert_eq!(post.excerpt, "");
        assert!(post.timestamp().is_some());
    }

    #[test]
    fn test_draft_requires_title() {
        assert!(Draft::default().into_post().is_err());

        let symbols = Draft {
            title: "???".to_string(),
            ..Default::default()
        };
        assert!(symbols.into_post().is_err());
    }
}
