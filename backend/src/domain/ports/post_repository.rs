//! Port for post persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ListingRequest, Post, PostDraft, PostFilter, PostId, PostSummary};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Driven port for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Summaries strictly after the request anchor, newest first.
    ///
    /// Returns up to `size + 1` rows so callers can detect a further page.
    async fn list(
        &self,
        filter: &PostFilter,
        request: &ListingRequest,
    ) -> Result<Vec<PostSummary>, PostPersistenceError>;

    /// Fetch a post with author and comment count.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Replace title and body; `None` when the post no longer exists.
    async fn update(
        &self,
        id: &PostId,
        draft: &PostDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, PostPersistenceError>;

    /// Delete a post and its comments; `false` when nothing was deleted.
    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError>;
}
