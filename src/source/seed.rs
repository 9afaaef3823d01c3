//! Built-in posts, used when no live source is reachable

use async_trait::async_trait;

use super::{GatewayError, PostSource};
use crate::content::Post;

const WELCOME: &str = r#"Welcome to the blog! Posts are plain **markdown** files with a short
front-matter block for the title, date, tags and excerpt.

## Writing a post

- Create it with `folio-rs new "My title"`
- Edit it with `folio-rs edit my-title`
- Remove it with `folio-rs delete my-title`

Every change is committed to the content repository and shows up here once the
post cache expires."#;

const SECURITY_NOTES: &str = r#"Security is mostly about awareness. Knowing which threats are out there
already puts you ahead of most attacks.

## Threats worth knowing

1. Phishing: fake emails or sites that ask for your password.
2. Weak passwords that appear in every leaked list.
3. Open ports nobody remembers opening.
4. Social engineering, where nobody needs to write any code.

## Habits

* Do not click links you did not expect.
* Use a password manager and unique passwords.
* Keep software updated."#;

/// The fixed seed set
pub fn seed_posts() -> Vec<Post> {
    let mut security = Post::new(
        "Security Notes From Practice",
        "2025-08-16T09:18:00.000Z",
        SECURITY_NOTES,
    );
    security.tags = vec!["Cybersecurity".into(), "InfoSec".into(), "Awareness".into()];
    security.excerpt = "Everyday security habits and the threats they protect against.".into();

    let mut welcome = Post::new("Hello World", "2025-08-16T10:00:00.000Z", WELCOME);
    welcome.tags = vec!["intro".into(), "welcome".into()];
    welcome.excerpt = "A first post to confirm the blog pipeline works.".into();

    vec![security, welcome]
}

/// Read-only source serving [`seed_posts`]
#[derive(Debug, Default)]
pub struct SeedSource;

impl SeedSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PostSource for SeedSource {
    fn name(&self) -> &'static str {
        "seed"
    }

    async fn fetch_all(&self, _credential: Option<&str>) -> Result<Vec<Post>, GatewayError> {
        Ok(seed_posts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_slugs_are_unique_and_dated() {
        let posts = seed_posts();
        let slugs: HashSet<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs.len(), posts.len());
        assert!(posts.iter().all(|p| p.timestamp().is_some()));
        assert!(slugs.contains("hello-world"));
    }

    #[tokio::test]
    async fn test_seed_source_lists_seed_posts() {
        let posts = SeedSource::new().fetch_all(None).await.unwrap();
        assert_eq!(posts, seed_posts());
    }
}
