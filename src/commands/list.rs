//! List posts and tags

use anyhow::Result;
use std::collections::HashMap;

use super::reader;
use crate::content::Post;
use crate::store::Origin;
use crate::Folio;

/// List site content by type
pub async fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let store = reader(folio)?;
    let snapshot = store.load_or_fallback().await?;

    if snapshot.origin == Origin::Fallback {
        println!("The {} source is unavailable; showing built-in posts.", store.source_name());
    }

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", snapshot.posts.len());
            for post in snapshot.posts.iter() {
                println!("  {} - {} [{}]", display_date(post), post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let tags = count_tags(&snapshot.posts);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

fn display_date(post: &Post) -> String {
    post.timestamp()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| post.date.clone())
}

/// Tags by descending use, then by name
fn count_tags(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<_> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tags() {
        let mut a = Post::new("A", "2025-01-01", "");
        a.tags = vec!["rust".into(), "cli".into()];
        let mut b = Post::new("B", "2025-01-02", "");
        b.tags = vec!["rust".into(), "web".into()];

        let tags = count_tags(&[a, b]);
        assert_eq!(
            tags,
            vec![
                ("rust".to_string(), 2),
                ("cli".to_string(), 1),
                ("web".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_display_date() {
        let post = Post::new("A", "2025-08-16T09:18:00.000Z", "");
        assert_eq!(display_date(&post), "2025-08-16");
        let odd = Post::new("B", "soon", "");
        assert_eq!(display_date(&odd), "soon");
    }
}
