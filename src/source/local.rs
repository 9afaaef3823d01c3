//! Posts stored as markdown files in a local directory

use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use super::{GatewayError, PostSink, PostSource};
use crate::content::{self, Post};

/// Revision token for a document: a hash of its bytes
pub fn revision_of(raw: &str) -> String {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// `<dir>/*.md`, with content hashes as revisions
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Current revision of a file, `None` when it does not exist
    async fn current_revision(&self, filename: &str) -> Result<Option<String>, GatewayError> {
        match tokio::fs::read_to_string(self.dir.join(filename)).await {
            Ok(raw) => Ok(Some(revision_of(&raw))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn load_post(path: &Path) -> Result<Post, GatewayError> {
        let raw = std::fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| GatewayError::Encoding(format!("{:?} is not a UTF-8 name", path)))?
            .to_string();

        let mut post = content::decode(&raw, &filename, Utc::now());
        post.filename = Some(filename);
        post.revision = Some(revision_of(&raw));
        Ok(post)
    }
}

#[async_trait]
impl PostSource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch_all(&self, _credential: Option<&str>) -> Result<Vec<Post>, GatewayError> {
        if !self.dir.exists() {
            return Err(GatewayError::ListFailed {
                status: None,
                message: format!("{} does not exist", self.dir.display()),
            });
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match Self::load_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Loaded {} posts from {}", posts.len(), self.dir.display());
        Ok(posts)
    }
}

#[async_trait]
impl PostSink for LocalSource {
    async fn save(
        &self,
        post: &Post,
        is_new: bool,
        _credential: Option<&str>,
    ) -> Result<Post, GatewayError> {
        let filename = if is_new {
            post.default_filename()
        } else {
            post.filename.clone().unwrap_or_else(|| post.default_filename())
        };

        let document = content::encode(post);
        let path = self.dir.join(&filename);

        if is_new {
            tokio::fs::create_dir_all(&self.dir).await?;
            // create_new makes the existence check and the create one step
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    return Err(GatewayError::Conflict { path: filename });
                }
                Err(e) => return Err(e.into()),
            };
            file.write_all(document.as_bytes()).await?;
            file.flush().await?;
        } else {
            match self.current_revision(&filename).await? {
                None => return Err(GatewayError::NotFound { path: filename }),
                Some(current) if post.revision.as_deref() != Some(current.as_str()) => {
                    return Err(GatewayError::Conflict { path: filename });
                }
                Some(_) => {}
            }
            tokio::fs::write(&path, &document).await?;
        }
        tracing::info!("Wrote {}", filename);

        let mut stored = post.clone();
        stored.revision = Some(revision_of(&document));
        stored.filename = Some(filename);
        Ok(stored)
    }

    async fn delete(&self, post: &Post, _credential: Option<&str>) -> Result<(), GatewayError> {
        let filename = post.filename.clone().unwrap_or_else(|| post.default_filename());

        if self.current_revision(&filename).await?.is_none() {
            return Err(GatewayError::NotFound { path: filename });
        }

        tokio::fs::remove_file(self.dir.join(&filename)).await?;
        tracing::info!("Deleted {}", filename);
        Ok(())
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
