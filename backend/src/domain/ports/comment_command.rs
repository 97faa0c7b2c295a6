//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, PostId, User};

/// Comment mutations. `actor` is `None` for anonymous callers.
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Comment on `post_id` as `actor`; `not_found` if the post is gone.
    async fn create(
        &self,
        actor: Option<&User>,
        post_id: &PostId,
        content: String,
    ) -> Result<Comment, Error>;

    /// Edit a comment owned by `actor`.
    async fn update(
        &self,
        actor: Option<&User>,
        id: &CommentId,
        content: String,
    ) -> Result<Comment, Error>;

    /// Delete a comment owned by `actor`.
    async fn delete(&self, actor: Option<&User>, id: &CommentId) -> Result<(), Error>;
}
