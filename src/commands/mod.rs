//! CLI commands

pub mod account;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod show;

use anyhow::Result;
use chrono::Utc;
use std::io::Read;
use std::sync::Arc;

use crate::source::PostSink;
use crate::store::PostStore;
use crate::Folio;

/// Read-only access to the posts
pub(crate) fn reader(folio: &Folio) -> Result<PostStore> {
    let backend = folio.backend()?;
    let token = folio.session()?.token();
    Ok(folio.store(&backend, token))
}

/// Everything a mutating command needs: a logged-in session, write access,
/// the token and a store to look posts up in
pub(crate) struct Editor {
    pub sink: Arc<dyn PostSink>,
    pub store: PostStore,
    pub token: Option<String>,
}

impl Editor {
    pub fn open(folio: &Folio) -> Result<Self> {
        let mut session = folio.session()?;
        session.require(Utc::now())?;

        let backend = folio.backend()?;
        let sink = backend.writable()?;
        let token = session.token();
        let store = folio.store(&backend, token.clone());

        Ok(Self { sink, store, token })
    }
}

/// Read a post body from a file, or stdin for `-`
pub fn read_body(path: &str) -> Result<String> {
    if path == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Split a comma-separated tag list
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
