//! Post service: listings, lookups and owner-only mutations.
//!
//! Mutations check, in order: authentication, existence, ownership, input
//! validity. An anonymous caller editing a missing post therefore sees
//! `unauthorized`, and a stranger submitting an empty title sees `forbidden`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use pagination::Page;
use tracing::{error, info};

use crate::domain::ports::{PostCommand, PostPersistenceError, PostQuery, PostRepository};
use crate::domain::{
    Author, Error, ListingRequest, Post, PostDraft, PostFilter, PostId, PostInput, PostSummary,
    SearchTerm, User, ensure_owner, require_actor,
};

pub(crate) fn map_post_repository_error(error: PostPersistenceError) -> Error {
    error!(error = %error, "post repository failure");
    Error::internal("post repository unavailable")
}

pub(crate) fn post_not_found(id: &PostId) -> Error {
    Error::not_found(format!("post {id} not found"))
}

pub(crate) fn cursor_error(err: &pagination::CursorError) -> Error {
    error!(error = %err, "failed to encode listing cursor");
    Error::internal("failed to build page")
}

/// Implements [`PostCommand`] and [`PostQuery`] over a [`PostRepository`].
#[derive(Clone)]
pub struct PostService<P> {
    posts: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> PostService<P> {
    /// Create a service over `posts`, stamping times from `clock`.
    pub fn new(posts: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, clock }
    }
}

impl<P> PostService<P>
where
    P: PostRepository,
{
    async fn page(
        &self,
        filter: &PostFilter,
        request: &ListingRequest,
    ) -> Result<Page<PostSummary>, Error> {
        let rows = self
            .posts
            .list(filter, request)
            .await
            .map_err(map_post_repository_error)?;
        Page::from_lookahead(rows, request.size(), PostSummary::listing_key)
            .map_err(|err| cursor_error(&err))
    }

    async fn load(&self, id: &PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_repository_error)?
            .ok_or_else(|| post_not_found(id))
    }
}

#[async_trait]
impl<P> PostQuery for PostService<P>
where
    P: PostRepository,
{
    async fn list(
        &self,
        search: Option<SearchTerm>,
        request: ListingRequest,
    ) -> Result<Page<PostSummary>, Error> {
        self.page(&PostFilter::search(search), &request).await
    }

    async fn list_mine(
        &self,
        actor: Option<&User>,
        request: ListingRequest,
    ) -> Result<Page<PostSummary>, Error> {
        let actor = require_actor(actor)?;
        self.page(&PostFilter::by_author(*actor.id()), &request)
            .await
    }

    async fn get(&self, id: &PostId) -> Result<Post, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<P> PostCommand for PostService<P>
where
    P: PostRepository,
{
    async fn create(&self, actor: Option<&User>, input: PostInput) -> Result<Post, Error> {
        let actor = require_actor(actor)?;
        let draft = PostDraft::try_from_input(input)?;
        let now = self.clock.utc().trunc_subsecs(6);
        let post = Post::new(PostId::random(), draft, Author::from(actor), now, now, 0);
        self.posts
            .insert(&post)
            .await
            .map_err(map_post_repository_error)?;
        info!(post_id = %post.id(), user_id = %actor.id(), "post created");
        Ok(post)
    }

    async fn update(
        &self,
        actor: Option<&User>,
        id: &PostId,
        input: PostInput,
    ) -> Result<Post, Error> {
        require_actor(actor)?;
        let existing = self.load(id).await?;
        ensure_owner(actor, existing.author().id(), "post", id)?;
        let draft = PostDraft::try_from_input(input)?;
        let updated_at = self.clock.utc().trunc_subsecs(6);
        let post = self
            .posts
            .update(id, &draft, updated_at)
            .await
            .map_err(map_post_repository_error)?
            .ok_or_else(|| post_not_found(id))?;
        info!(post_id = %id, "post updated");
        Ok(post)
    }

    async fn delete(&self, actor: Option<&User>, id: &PostId) -> Result<(), Error> {
        require_actor(actor)?;
        let existing = self.load(id).await?;
        ensure_owner(actor, existing.author().id(), "post", id)?;
        let deleted = self
            .posts
            .delete(id)
            .await
            .map_err(map_post_repository_error)?;
        if !deleted {
            return Err(post_not_found(id));
        }
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
