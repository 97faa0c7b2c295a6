//! Port for comment persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentBody, CommentId, ListingRequest, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The parent post vanished before the insert.
        MissingPost { post_id: PostId } => "post {post_id} does not exist",
    }
}

/// Driven port for comments, always scoped to a post.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on `post_id` strictly after the request anchor, oldest first.
    ///
    /// Returns up to `size + 1` rows so callers can detect a further page.
    async fn list(
        &self,
        post_id: &PostId,
        request: &ListingRequest,
    ) -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Fetch a comment with its author.
    async fn find_by_id(&self, id: &CommentId)
    -> Result<Option<Comment>, CommentPersistenceError>;

    /// Insert a new comment.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    /// Replace the body; `None` when the comment no longer exists.
    async fn update(
        &self,
        id: &CommentId,
        content: &CommentBody,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CommentPersistenceError>;

    /// Delete a comment; `false` when nothing was deleted.
    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError>;
}
