//! Post store - a time-bounded cache in front of a post source
//!
//! Readers call [`PostStore::load_all`] or [`PostStore::get_by_slug`]; the
//! source is only contacted when the cached list is older than the freshness
//! window or was invalidated. Refreshes are serialized: callers arriving
//! while a fetch is running wait for it and share its result.

mod clock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::content::Post;
use crate::source::{GatewayError, PostSource};

/// Default freshness window
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to load posts: {0}")]
    Source(#[from] GatewayError),
}

/// Where a post list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Loaded from the configured source
    Live,
    /// Built-in posts served because the source failed
    Fallback,
}

/// A post list tagged with its origin
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub posts: Arc<Vec<Post>>,
    pub origin: Origin,
}

impl Snapshot {
    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }
}

/// Observable state of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Fresh,
    Stale,
}

struct CachedPosts {
    posts: Arc<Vec<Post>>,
    loaded_at: DateTime<Utc>,
}

pub struct PostStore {
    source: Arc<dyn PostSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    credential: Option<String>,
    fallback: Option<Vec<Post>>,
    cache: Mutex<Option<CachedPosts>>,
}

impl PostStore {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_TTL,
            credential: None,
            fallback: None,
            cache: Mutex::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Credential passed to the source on every fetch
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    /// Posts served by [`PostStore::load_or_fallback`] when the source fails
    pub fn with_fallback(mut self, posts: Vec<Post>) -> Self {
        self.fallback = Some(arrange(posts));
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// All posts, newest first
    pub async fn load_all(&self) -> Result<Arc<Vec<Post>>, StoreError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if self.is_fresh(cached) {
                tracing::debug!("Post cache hit ({} posts)", cached.posts.len());
                return Ok(cached.posts.clone());
            }
        }

        tracing::debug!("Post cache miss, fetching from {}", self.source.name());
        let fetched = self.source.fetch_all(self.credential.as_deref()).await?;
        let posts = Arc::new(arrange(fetched));

        *cache = Some(CachedPosts {
            posts: posts.clone(),
            loaded_at: self.clock.now(),
        });

        tracing::info!("Loaded {} posts", posts.len());
        Ok(posts)
    }

    /// Like [`PostStore::load_all`], but serves the fallback posts on failure
    pub async fn load_or_fallback(&self) -> Result<Snapshot, StoreError> {
        match self.load_all().await {
            Ok(posts) => Ok(Snapshot {
                posts,
                origin: Origin::Live,
            }),
            Err(e) => match &self.fallback {
                Some(posts) => {
                    tracing::warn!("{}; serving {} built-in posts", e, posts.len());
                    Ok(Snapshot {
                        posts: Arc::new(posts.clone()),
                        origin: Origin::Fallback,
                    })
                }
                None => Err(e),
            },
        }
    }

    /// Look up one post; `Ok(None)` when no post has this slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let posts = self.load_all().await?;
        let found = posts.iter().find(|p| p.slug == slug).cloned();
        if found.is_none() {
            tracing::debug!("No post with slug {:?}", slug);
        }
        Ok(found)
    }

    /// Drop the cached list so the next load hits the source
    pub async fn invalidate_cache(&self) {
        self.cache.lock().await.take();
        tracing::debug!("Post cache cleared");
    }

    pub fn state(&self) -> CacheState {
        match self.cache.try_lock() {
            Err(_) => CacheState::Loading,
            Ok(cache) => match cache.as_ref() {
                None => CacheState::Empty,
                Some(cached) if self.is_fresh(cached) => CacheState::Fresh,
                Some(_) => CacheState::Stale,
            },
        }
    }

    fn is_fresh(&self, cached: &CachedPosts) -> bool {
        // A clock that went backwards keeps the entry fresh
        self.clock
            .now()
            .signed_duration_since(cached.loaded_at)
            .to_std()
            .map(|age| age < self.ttl)
            .unwrap_or(true)
    }
}

/// Sort newest first (stable for equal dates) and keep one post per slug
fn arrange(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by_cached_key(|p| Reverse(p.timestamp()));

    let mut seen = HashSet::new();
    posts.retain(|p| {
        let fresh = seen.insert(p.slug.clone());
        if !fresh {
            tracing::warn!(
                "Dropping {:?}: slug {:?} is already used by a newer post",
                p.filename.as_deref().unwrap_or(&p.title),
                p.slug
            );
        }
        fresh
    });

    posts
}
