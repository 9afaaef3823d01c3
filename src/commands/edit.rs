//! Update an existing post

use anyhow::Result;

use super::Editor;
use crate::content::{slugify, Post};
use crate::Folio;

/// Fields to change; `None` keeps the current value
#[derive(Debug, Default, Clone)]
pub struct Changes {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.tags.is_none() && self.excerpt.is_none() && self.body.is_none()
    }

    /// Apply to a post, keeping its date, file name and revision
    pub fn apply(self, post: &mut Post) -> Result<()> {
        if let Some(title) = self.title {
            let title = title.trim();
            if title.is_empty() {
                anyhow::bail!("Please enter a title");
            }
            if slugify(title).is_empty() {
                anyhow::bail!("Title {:?} has no letters or digits to build a slug from", title);
            }
            post.retitle(title);
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(body) = self.body {
            post.content = body.trim().to_string();
        }
        Ok(())
    }
}

/// Update the post with `slug`
pub async fn edit_post(folio: &Folio, slug: &str, changes: Changes) -> Result<Post> {
    if changes.is_empty() {
        anyhow::bail!("Nothing to change: pass --title, --tags, --excerpt or --file");
    }

    let editor = Editor::open(folio)?;
    let mut post = editor
        .store
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No post with slug {:?}", slug))?;

    let old_slug = post.slug.clone();
    changes.apply(&mut post)?;

    // A new title must not take over another post's slug
    if post.slug != old_slug {
        if let Some(other) = editor.store.get_by_slug(&post.slug).await? {
            if other.filename != post.filename {
                anyhow::bail!("A post with slug {:?} already exists", post.slug);
            }
        }
    }

    let saved = editor
        .sink
        .save(&post, false, editor.token.as_deref())
        .await?;
    editor.store.invalidate_cache().await;

    println!("Updated: {} [{}]", saved.title, saved.slug);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, Argon2Verifier};
    use crate::commands::new::{create_post, Draft};
    use crate::config::SiteConfig;
    use crate::source::SourceKind;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_apply_changes() {
        let mut post = Post::new("Old Title", "2025-01-01", "Old body");
        post.filename = Some("old-title.md".to_string());
        post.revision = Some("abc".to_string());

        Changes {
            title: Some("New Title".to_string()),
            tags: Some(vec!["x".to_string()]),
            excerpt: None,
            body: Some(" New body \n".to_string()),
        }
        .apply(&mut post)
        .unwrap();

        assert_eq!(post.title, "New Title");
        assert_eq!(post.slug, "new-title");
        assert_eq!(post.tags, vec!["x"]);
        assert_eq!(post.content, "New body");
        assert_eq!(post.date, "2025-01-01");
        assert_eq!(post.filename.as_deref(), Some("old-title.md"));
        assert_eq!(post.revision.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut post = Post::new("Keep", "2025-01-01", "");
        let changes = Changes {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(changes.apply(&mut post).is_err());
        assert_eq!(post.title, "Keep");
    }

    #[test]
    fn test_title_without_slug_rejected() {
        let mut post = Post::new("Keep", "2025-01-01", "");
        let changes = Changes {
            title: Some("???".to_string()),
            ..Default::default()
        };
        assert!(changes.apply(&mut post).is_err());
        assert_eq!(post.slug, "keep");
    }

    #[tokio::test]
    async fn test_retitle_onto_taken_slug_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            source: SourceKind::Local,
            ..Default::default()
        };
        let folio = Folio::with_config(tmp.path().to_path_buf(), config);
        let verifier = Argon2Verifier::new("admin", hash_password("pw").unwrap());
        folio
            .session()
            .unwrap()
            .login(&verifier, "admin", "pw", Utc::now())
            .unwrap();

        for title in ["Alpha", "Beta"] {
            let draft = Draft {
                title: title.to_string(),
                body: format!("{} body", title),
                ..Default::default()
            };
            create_post(&folio, draft).await.unwrap();
        }

        let err = edit_post(
            &folio,
            "beta",
            Changes {
                title: Some("Alpha".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("already exists"), "{}", err);

        let backend = folio.backend().unwrap();
        let posts = folio.store(&backend, None).load_all().await.unwrap();
        let mut visible: Vec<(&str, &str)> = posts
            .iter()
            .map(|p| (p.slug.as_str(), p.content.as_str()))
            .collect();
        visible.sort();
        assert_eq!(visible, vec![("alpha", "Alpha body"), ("beta", "Beta body")]);

        // Same slug, different casing, is still the same post
        let renamed = edit_post(
            &folio,
            "beta",
            Changes {
                title: Some("BETA".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.slug, "beta");
        assert_eq!(renamed.filename.as_deref(), Some("beta.md"));
    }

    #[test]
    fn test_empty_changes() {
        assert!(Changes::default().is_empty());
    }
}
