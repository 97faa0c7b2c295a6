//! Driving port for post reads.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, ListingRequest, Post, PostId, PostSummary, SearchTerm, User};

/// Post listings and lookups.
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// All posts, newest first, optionally filtered by `search`.
    async fn list(
        &self,
        search: Option<SearchTerm>,
        request: ListingRequest,
    ) -> Result<Page<PostSummary>, Error>;

    /// Posts written by `actor`, newest first; requires authentication.
    async fn list_mine(
        &self,
        actor: Option<&User>,
        request: ListingRequest,
    ) -> Result<Page<PostSummary>, Error>;

    /// A single post, or `not_found`.
    async fn get(&self, id: &PostId) -> Result<Post, Error>;
}
