//! HTML pages for the blog list and single posts

use crate::config::SiteConfig;
use crate::content::{html_escape, Post};
use crate::store::{Origin, Snapshot};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; background: #0b0f14; color: #d6e2ee; }
a { color: #22d3ee; }
.meta { color: #8aa0b4; font-size: 0.9rem; }
.tag { display: inline-block; border: 1px solid #22d3ee55; border-radius: 4px; padding: 0 0.4rem; margin-right: 0.3rem; }
.notice { border: 1px solid #f59e0b; padding: 0.5rem 1rem; color: #f59e0b; }
pre { overflow-x: auto; padding: 0.75rem; }
"#;

/// `path` is the page's own address, for the canonical link
fn layout(config: &SiteConfig, title: &str, path: Option<&str>, body: &str) -> String {
    let canonical = path
        .map(|path| {
            format!(
                r#"<link rel="canonical" href="{}{}">"#,
                html_escape(config.url.trim_end_matches('/')),
                html_escape(path)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
{canonical}
<style>{style}</style>
</head>
<body>
<header><a href="/blog">{site}</a></header>
<main>
{body}
</main>
<footer class="meta">&copy; {author}</footer>
</body>
</html>
"#,
        lang = html_escape(&config.language),
        title = html_escape(title),
        site = html_escape(&config.title),
        canonical = canonical,
        style = STYLE,
        body = body,
        author = html_escape(&config.author),
    )
}

fn fallback_notice(origin: Origin) -> &'static str {
    match origin {
        Origin::Live => "",
        Origin::Fallback => {
            r#"<p class="notice">Posts could not be loaded right now; showing built-in posts. <a href="">Try again</a></p>"#
        }
    }
}

fn tags(post: &Post) -> String {
    post.tags
        .iter()
        .map(|t| format!(r#"<span class="tag">{}</span>"#, html_escape(t)))
        .collect()
}

fn display_date(post: &Post) -> String {
    post.timestamp()
        .map(|ts| ts.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| post.date.clone())
}

pub fn list_page(config: &SiteConfig, snapshot: &Snapshot) -> String {
    let mut body = String::from("<h1>Blog</h1>\n");
    body.push_str(fallback_notice(snapshot.origin));

    if snapshot.posts.is_empty() {
        body.push_str("<p>No posts yet.</p>\n");
    }

    for post in snapshot.posts.iter() {
        body.push_str(&format!(
            r#"<article>
<h2><a href="/blog/{slug}">{title}</a></h2>
<p class="meta">{date} {tags}</p>
<p>{excerpt}</p>
</article>
"#,
            slug = html_escape(&post.slug),
            title = html_escape(&post.title),
            date = html_escape(&display_date(post)),
            tags = tags(post),
            excerpt = html_escape(&post.summary()),
        ));
    }

    layout(config, "Blog", Some("/blog"), &body)
}

/// `html` is the already rendered post body
pub fn post_page(config: &SiteConfig, post: &Post, html: &str, origin: Origin) -> String {
    let body = format!(
        r#"{notice}<article>
<h1>{title}</h1>
<p class="meta">{date} {tags}</p>
{html}
</article>
<p><a href="/blog">&larr; All posts</a></p>
"#,
        notice = fallback_notice(origin),
        title = html_escape(&post.title),
        date = html_escape(&display_date(post)),
        tags = tags(post),
        html = html,
    );

    let path = format!("/blog/{}", post.slug);
    layout(config, &post.title, Some(&path), &body)
}

pub fn not_found_page(config: &SiteConfig, slug: &str) -> String {
    let body = format!(
        r#"<h1>Post not found</h1>
<p>There is no post called <code>{}</code>.</p>
<p><a href="/blog">&larr; All posts</a></p>
"#,
        html_escape(slug)
    );
    layout(config, "Not found", None, &body)
}

pub fn error_page(config: &SiteConfig, message: &str) -> String {
    let body = format!(
        r#"<h1>Posts are unavailable</h1>
<p>{}</p>
<p><a href="">Try again</a></p>
"#,
        html_escape(message)
    );
    layout(config, "Unavailable", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn snapshot(origin: Origin) -> Snapshot {
        let mut post = Post::new("Rust <3", "2025-06-01", "Body");
        post.tags = vec!["rust".to_string()];
        Snapshot {
            posts: Arc::new(vec![post]),
            origin,
        }
    }

    #[test]
    fn test_list_page_escapes_and_links() {
        let html = list_page(&SiteConfig::default(), &snapshot(Origin::Live));
        assert!(html.contains(r#"<a href="/blog/rust-3">Rust &lt;3</a>"#));
        assert!(html.contains("June 1, 2025"));
        assert!(!html.contains("built-in posts"));
    }

    #[test]
    fn test_fallback_is_announced() {
        let html = list_page(&SiteConfig::default(), &snapshot(Origin::Fallback));
        assert!(html.contains("showing built-in posts"));
    }

    #[test]
    fn test_post_page_embeds_rendered_body() {
        let snap = snapshot(Origin::Live);
        let html = post_page(&SiteConfig::default(), &snap.posts[0], "<p>Body</p>", Origin::Live);
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<title>Rust &lt;3 | Folio</title>"));
    }

    #[test]
    fn test_canonical_links_use_site_url() {
        let config = SiteConfig {
            url: "https://example.dev/".to_string(),
            ..Default::default()
        };
        let snap = snapshot(Origin::Live);

        let list = list_page(&config, &snap);
        assert!(list.contains(r#"<link rel="canonical" href="https://example.dev/blog">"#));

        let post = post_page(&config, &snap.posts[0], "", Origin::Live);
        assert!(post.contains(r#"<link rel="canonical" href="https://example.dev/blog/rust-3">"#));

        assert!(!not_found_page(&config, "x").contains("canonical"));
    }
}
