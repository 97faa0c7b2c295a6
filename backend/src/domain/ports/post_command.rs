//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId, PostInput, User};

/// Post mutations. `actor` is `None` for anonymous callers.
///
/// Implementations check, in order: authentication, existence, ownership,
/// then input validity.
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Create a post authored by `actor`.
    async fn create(&self, actor: Option<&User>, input: PostInput) -> Result<Post, Error>;

    /// Edit a post owned by `actor`.
    async fn update(
        &self,
        actor: Option<&User>,
        id: &PostId,
        input: PostInput,
    ) -> Result<Post, Error>;

    /// Delete a post owned by `actor`, with its comments.
    async fn delete(&self, actor: Option<&User>, id: &PostId) -> Result<(), Error>;
}
