//! Post sources - where posts are listed from and written to
//!
//! Every backing store is reached through [`PostSource`]; the writable ones
//! also implement [`PostSink`]. Which one is used is decided by `source:` in
//! the site configuration.

mod error;
pub mod github;
pub mod local;
pub mod seed;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use error::GatewayError;
pub use github::GithubGateway;
pub use local::LocalSource;
pub use seed::SeedSource;

use crate::content::Post;
use crate::Folio;

/// A source that can list and fetch posts
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Fetch every post. Order is unspecified.
    async fn fetch_all(&self, credential: Option<&str>) -> Result<Vec<Post>, GatewayError>;
}

/// A source that can also create, update and delete posts
#[async_trait]
pub trait PostSink: PostSource {
    /// Create (`is_new`) or update a post, returning it with its new revision
    async fn save(
        &self,
        post: &Post,
        is_new: bool,
        credential: Option<&str>,
    ) -> Result<Post, GatewayError>;

    /// Delete a post, re-reading its revision first
    async fn delete(&self, post: &Post, credential: Option<&str>) -> Result<(), GatewayError>;
}

/// Which backing store posts live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Github,
    Local,
    Seed,
}

/// The configured source, with write access when it supports it
#[derive(Clone)]
pub struct Backend {
    pub source: Arc<dyn PostSource>,
    pub sink: Option<Arc<dyn PostSink>>,
}

impl Backend {
    /// Build the backend selected by the site configuration
    pub fn from_site(folio: &Folio) -> Result<Self, GatewayError> {
        let backend = match folio.config.source {
            SourceKind::Github => {
                let gateway = Arc::new(GithubGateway::new(folio.config.github.clone())?);
                Self {
                    source: gateway.clone(),
                    sink: Some(gateway),
                }
            }
            SourceKind::Local => {
                let local = Arc::new(LocalSource::new(&folio.posts_dir));
                Self {
                    source: local.clone(),
                    sink: Some(local),
                }
            }
            SourceKind::Seed => Self {
                source: Arc::new(SeedSource::new()),
                sink: None,
            },
        };

        tracing::debug!("Using {} post source", backend.source.name());
        Ok(backend)
    }

    /// Write access, or an error naming the read-only source
    pub fn writable(&self) -> Result<Arc<dyn PostSink>, GatewayError> {
        self.sink
            .clone()
            .ok_or_else(|| GatewayError::ReadOnly(self.source.name()))
    }
}
