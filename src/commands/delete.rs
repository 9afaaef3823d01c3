//! Delete a post

use anyhow::Result;

use super::Editor;
use crate::source::GatewayError;
use crate::Folio;

/// Delete the post with `slug`. A file that is already gone is not an error.
pub async fn delete_post(folio: &Folio, slug: &str) -> Result<()> {
    let editor = Editor::open(folio)?;
    let post = editor
        .store
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No post with slug {:?}", slug))?;

    let result = editor.sink.delete(&post, editor.token.as_deref()).await;
    editor.store.invalidate_cache().await;

    match result {
        Ok(()) => println!("Deleted: {}", post.title),
        Err(GatewayError::NotFound { path }) => {
            tracing::warn!("{} was already deleted", path);
            println!("Already deleted: {}", post.title);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
