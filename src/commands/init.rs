//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content;
use crate::source::seed::seed_posts;

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

# Site
title: Folio
author: John Doe
language: en
url: http://localhost:4000

# Posts
## Where posts live: github, local or seed
source: local
posts_dir: posts
## Seconds a loaded post list stays fresh
cache_ttl: 300
## Serve the built-in posts when the source is unreachable
fallback: true
highlight_theme: base16-ocean.dark

github:
  api_url: https://api.github.com
  owner: ''
  repo: ''
  path: src/posts
  branch: master

# Admin
## The admin login is checked against FOLIO_ADMIN_USER and
## FOLIO_ADMIN_PASSWORD_HASH (see `folio-rs hash-password`)
session_hours: 24
credentials_file: .folio/credentials.json
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    let posts_dir = target_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    for post in seed_posts() {
        let path = posts_dir.join(post.default_filename());
        if !path.exists() {
            fs::write(&path, content::encode(&post))?;
            tracing::debug!("Wrote {:?}", path);
        }
    }

    Ok(())
}
