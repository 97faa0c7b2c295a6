//! Driving port for comment reads.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Comment, Error, ListingRequest, PostId};

/// Comment listings.
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// Comments on `post_id`, oldest first. A missing post yields an empty page.
    async fn list(&self, post_id: &PostId, request: ListingRequest)
    -> Result<Page<Comment>, Error>;
}
