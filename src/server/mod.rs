//! HTTP server for the blog: JSON API plus plain HTML pages

mod pages;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post};
use crate::store::{Origin, PostStore, Snapshot, StoreError};
use crate::Folio;

/// Server state
pub struct ServerState {
    pub store: PostStore,
    pub renderer: MarkdownRenderer,
    pub config: SiteConfig,
}

impl ServerState {
    pub fn new(store: PostStore, config: SiteConfig) -> Self {
        let renderer = MarkdownRenderer::with_theme(&config.highlight_theme);
        Self {
            store,
            renderer,
            config,
        }
    }
}

#[derive(Serialize)]
struct PostSummary<'a> {
    title: &'a str,
    slug: &'a str,
    date: &'a str,
    tags: &'a [String],
    excerpt: String,
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            title: &post.title,
            slug: &post.slug,
            date: &post.date,
            tags: &post.tags,
            excerpt: post.summary(),
        }
    }
}

#[derive(Serialize)]
struct PostList<'a> {
    origin: Origin,
    posts: Vec<PostSummary<'a>>,
}

#[derive(Serialize)]
struct PostDetail<'a> {
    origin: Origin,
    #[serde(flatten)]
    summary: PostSummary<'a>,
    content: &'a str,
    html: String,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/blog") }))
        .route("/api/posts", get(api_list))
        .route("/api/posts/:slug", get(api_post))
        .route("/blog", get(blog_list))
        .route("/blog/:slug", get(blog_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let backend = folio.backend()?;
    let token = folio.session()?.token();
    let store = folio.store(&backend, token);
    let state = Arc::new(ServerState::new(store, folio.config.clone()));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}/blog", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn api_list(State(state): State<Arc<ServerState>>) -> Response {
    match state.store.load_or_fallback().await {
        Ok(snapshot) => Json(PostList {
            origin: snapshot.origin,
            posts: snapshot.posts.iter().map(PostSummary::from).collect(),
        })
        .into_response(),
        Err(e) => api_unavailable(e),
    }
}

async fn api_post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    let snapshot = match state.store.load_or_fallback().await {
        Ok(snapshot) => snapshot,
        Err(e) => return api_unavailable(e),
    };

    match snapshot.find(&slug) {
        Some(post) => Json(PostDetail {
            origin: snapshot.origin,
            summary: PostSummary::from(post),
            content: &post.content,
            html: state.renderer.render(&post.content),
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("No post with slug {:?}", slug),
            }),
        )
            .into_response(),
    }
}

async fn blog_list(State(state): State<Arc<ServerState>>) -> Response {
    match state.store.load_or_fallback().await {
        Ok(snapshot) => Html(pages::list_page(&state.config, &snapshot)).into_response(),
        Err(e) => page_unavailable(&state.config, e),
    }
}

async fn blog_post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    let snapshot: Snapshot = match state.store.load_or_fallback().await {
        Ok(snapshot) => snapshot,
        Err(e) => return page_unavailable(&state.config, e),
    };

    match snapshot.find(&slug) {
        Some(post) => {
            let body = state.renderer.render(&post.content);
            Html(pages::post_page(&state.config, post, &body, snapshot.origin)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Html(pages::not_found_page(&state.config, &slug)),
        )
            .into_response(),
    }
}

fn api_unavailable(e: StoreError) -> Response {
    tracing::error!("{}", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiError {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn page_unavailable(config: &SiteConfig, e: StoreError) -> Response {
    tracing::error!("{}", e);
    (
        StatusCode::BAD_GATEWAY,
        Html(pages::error_page(config, &e.to_string())),
    )
        .into_response()
}
