//! GitHub-backed posts, through the repository contents API

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{GatewayError, PostSink, PostSource};
use crate::config::GithubConfig;
use crate::content::{self, Post};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Characters kept as-is in a file name path segment
const FILENAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// One entry of a directory listing or a single-file metadata response
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    sha: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: ContentEntry,
}

#[derive(Debug, Default, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Reads and writes markdown files in `owner/repo/path` on one branch
pub struct GithubGateway {
    config: GithubConfig,
    client: Client,
}

impl GithubGateway {
    pub fn new(config: GithubConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(concat!("folio-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// URL of the posts directory
    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            self.config.path.trim_matches('/')
        )
    }

    fn file_url(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.contents_url(),
            utf8_percent_encode(filename, FILENAME)
        )
    }

    /// Repository path used in error messages
    fn file_path(&self, filename: &str) -> String {
        format!("{}/{}", self.config.path.trim_matches('/'), filename)
    }

    fn request(&self, method: Method, url: &str, credential: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, url).header(ACCEPT, GITHUB_ACCEPT);
        match credential.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_file(&self, entry: &ContentEntry, credential: Option<&str>) -> Result<Post, GatewayError> {
        let url = entry.download_url.as_deref().ok_or_else(|| {
            GatewayError::Encoding(format!("{} has no download URL", entry.name))
        })?;

        let response = self.request(Method::GET, url, credential).send().await?;
        let response = check(response, &self.file_path(&entry.name)).await?;
        let raw = response.text().await?;

        let mut post = content::decode(&raw, &entry.name, Utc::now());
        post.filename = Some(entry.name.clone());
        post.revision = Some(entry.sha.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostSource for GithubGateway {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn fetch_all(&self, credential: Option<&str>) -> Result<Vec<Post>, GatewayError> {
        let url = self.contents_url();
        tracing::debug!("Listing posts from {}", url);

        let response = self
            .request(Method::GET, &url, credential)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ApiMessage>().await.unwrap_or_default();
            return Err(GatewayError::ListFailed {
                status: Some(status.as_u16()),
                message: body.message,
            });
        }

        let entries: Vec<ContentEntry> =
            response
                .json()
                .await
                .map_err(|e| GatewayError::ListFailed {
                    status: Some(status.as_u16()),
                    message: e.to_string(),
                })?;

        let mut posts = Vec::new();
        for entry in entries
            .iter()
            .filter(|e| e.name.ends_with(".md") && (e.kind.is_empty() || e.kind == "file"))
        {
            match self.fetch_file(entry, credential).await {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry.name, e);
                }
            }
        }

        tracing::info!("Fetched {} posts from {}/{}", posts.len(), self.config.owner, self.config.repo);
        Ok(posts)
    }
}

#[async_trait]
impl PostSink for GithubGateway {
    async fn save(
        &self,
        post: &Post,
        is_new: bool,
        credential: Option<&str>,
    ) -> Result<Post, GatewayError> {
        let token = require_credential(credential)?;

        let filename = if is_new {
            post.default_filename()
        } else {
            post.filename.clone().unwrap_or_else(|| post.default_filename())
        };

        let message = if is_new {
            format!("Add new post: {}", post.title)
        } else {
            format!("Update post: {}", post.title)
        };

        let body = PutRequest {
            message,
            content: STANDARD.encode(content::encode(post).as_bytes()),
            branch: &self.config.branch,
            sha: if is_new { None } else { post.revision.as_deref() },
        };

        let response = self
            .request(Method::PUT, &self.file_url(&filename), Some(token))
            .json(&body)
            .send()
            .await?;
        let response = check(response, &self.file_path(&filename)).await?;
        let saved: PutResponse = response.json().await?;

        tracing::info!(
            "{} {} (revision {})",
            if is_new { "Created" } else { "Updated" },
            saved.content.name,
            saved.content.sha
        );

        let mut stored = post.clone();
        stored.filename = Some(saved.content.name);
        stored.revision = Some(saved.content.sha);
        Ok(stored)
    }

    async fn delete(&self, post: &Post, credential: Option<&str>) -> Result<(), GatewayError> {
        let token = require_credential(credential)?;

        let filename = post.filename.clone().unwrap_or_else(|| post.default_filename());
        let url = self.file_url(&filename);
        let path = self.file_path(&filename);

        // Fresh read so the delete uses the revision stored right now
        let response = self
            .request(Method::GET, &url, Some(token))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;
        let current: ContentEntry = check(response, &path).await?.json().await?;

        let body = DeleteRequest {
            message: format!("Delete post: {}", post.title),
            sha: &current.sha,
            branch: &self.config.branch,
        };

        let response = self
            .request(Method::DELETE, &url, Some(token))
            .json(&body)
            .send()
            .await?;
        check(response, &path).await?;

        tracing::info!("Deleted {}", path);
        Ok(())
    }
}

fn require_credential(credential: Option<&str>) -> Result<&str, GatewayError> {
    credential
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GatewayError::Unauthenticated)
}

/// Map an unsuccessful response onto the matching error
async fn check(response: Response, path: &str) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<ApiMessage>().await.unwrap_or_default();
    tracing::debug!("{} answered {}: {}", path, status, body.message);

    Err(match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthenticated,
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => GatewayError::Conflict {
            path: path.to_string(),
        },
        StatusCode::NOT_FOUND => GatewayError::NotFound {
            path: path.to_string(),
        },
        _ => GatewayError::Remote {
            status: status.as_u16(),
            message: body.message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> GithubGateway {
        GithubGateway::new(GithubConfig {
            api_url: "https://api.github.com/".to_string(),
            owner: "someone".to_string(),
            repo: "site".to_string(),
            path: "/src/posts/".to_string(),
            branch: "master".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let gw = gateway();
        assert_eq!(
            gw.contents_url(),
            "https://api.github.com/repos/someone/site/contents/src/posts"
        );
        assert_eq!(
            gw.file_url("hello world.md"),
            "https://api.github.com/repos/someone/site/contents/src/posts/hello%20world.md"
        );
        assert_eq!(gw.file_path("a.md"), "src/posts/a.md");
    }

    #[test]
    fn test_require_credential() {
        assert!(matches!(require_credential(None), Err(GatewayError::Unauthenticated)));
        assert!(matches!(require_credential(Some("  ")), Err(GatewayError::Unauthenticated)));
        assert_eq!(require_credential(Some(" tok ")).unwrap(), "tok");
    }

    #[tokio::test]
    async fn test_save_without_credential_sends_nothing() {
        let gw = gateway();
        let post = Post::new("Title", "2025-01-01", "Body");
        let err = gw.save(&post, true, None).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated));

        let err = gw.delete(&post, Some("")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated));
    }
}
