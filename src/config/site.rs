//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::source::SourceKind;

/// Environment variable that overrides the stored GitHub token
pub const TOKEN_ENV: &str = "FOLIO_GITHUB_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub language: String,
    /// Public address of the site, used for canonical links
    pub url: String,

    // Posts
    pub source: SourceKind,
    pub posts_dir: String,
    #[serde(default)]
    pub github: GithubConfig,
    /// Seconds a loaded post list stays fresh
    pub cache_ttl: u64,
    /// Serve the built-in posts when the live source fails
    pub fallback: bool,
    pub highlight_theme: String,

    // Admin
    pub session_hours: i64,
    pub credentials_file: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            url: "http://localhost:4000".to_string(),

            source: SourceKind::Github,
            posts_dir: "posts".to_string(),
            github: GithubConfig::default(),
            cache_ttl: 300,
            fallback: true,
            highlight_theme: "base16-ocean.dark".to_string(),

            session_hours: 24,
            credentials_file: ".folio/credentials.json".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Freshness window of the post cache
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

/// Location of the posts in a GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Directory holding the markdown files
    pub path: String,
    pub branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            path: "src/posts".to_string(),
            branch: "master".to_string(),
        }
    }
}
