//! folio-rs: the blog engine behind a personal portfolio site
//!
//! Posts are markdown files with a small front-matter block. They are read
//! from a GitHub repository, a local directory or a built-in seed set, kept
//! in a time-bounded cache, served over HTTP and managed from the CLI.

pub mod auth;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod source;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

use source::Backend;
use store::PostStore;

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory of the local post source
    pub posts_dir: PathBuf,
    /// Credential store file
    pub credentials_path: PathBuf,
}

impl Folio {
    /// Create a new instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let credentials_path = base_dir.join(&config.credentials_file);

        Self {
            config,
            base_dir,
            posts_dir,
            credentials_path,
        }
    }

    /// The configured post source
    pub fn backend(&self) -> Result<Backend> {
        Ok(Backend::from_site(self)?)
    }

    /// A post store over `backend`, configured from the site settings
    pub fn store(&self, backend: &Backend, credential: Option<String>) -> PostStore {
        let store = PostStore::new(backend.source.clone())
            .with_ttl(self.config.cache_ttl())
            .with_credential(credential);

        if self.config.fallback {
            store.with_fallback(source::seed::seed_posts())
        } else {
            store
        }
    }

    /// Admin session backed by the credential store
    pub fn session(&self) -> Result<auth::Session> {
        let store = auth::CredentialStore::open(&self.credentials_path)?;
        Ok(auth::Session::new(store, self.config.session_hours))
    }
}
