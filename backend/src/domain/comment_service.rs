//! Comment service: per-post listings and owner-only mutations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use pagination::Page;
use tracing::{error, info};

use crate::domain::ports::{
    CommentCommand, CommentPersistenceError, CommentQuery, CommentRepository, PostRepository,
};
use crate::domain::post_service::{cursor_error, map_post_repository_error, post_not_found};
use crate::domain::{
    Author, Comment, CommentBody, CommentId, Error, ListingRequest, PostId, User, ensure_owner,
    require_actor,
};

fn map_repository_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::MissingPost { post_id } => post_not_found(&post_id),
        other => {
            error!(error = %other, "comment repository failure");
            Error::internal("comment repository unavailable")
        }
    }
}

fn comment_not_found(id: &CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}

/// Implements [`CommentCommand`] and [`CommentQuery`].
#[derive(Clone)]
pub struct CommentService<C, P> {
    comments: Arc<C>,
    posts: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> CommentService<C, P> {
    /// Create a service over `comments`, checking parents in `posts`.
    pub fn new(comments: Arc<C>, posts: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            posts,
            clock,
        }
    }
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn load(&self, id: &CommentId) -> Result<Comment, Error> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| comment_not_found(id))
    }
}

#[async_trait]
impl<C, P> CommentQuery for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn list(
        &self,
        post_id: &PostId,
        request: ListingRequest,
    ) -> Result<Page<Comment>, Error> {
        let rows = self
            .comments
            .list(post_id, &request)
            .await
            .map_err(map_repository_error)?;
        Page::from_lookahead(rows, request.size(), Comment::listing_key)
            .map_err(|err| cursor_error(&err))
    }
}

#[async_trait]
impl<C, P> CommentCommand for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn create(
        &self,
        actor: Option<&User>,
        post_id: &PostId,
        content: String,
    ) -> Result<Comment, Error> {
        let actor = require_actor(actor)?;
        let body = CommentBody::new(content)?;
        let parent = self
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_repository_error)?;
        if parent.is_none() {
            return Err(post_not_found(post_id));
        }

        let now = self.clock.utc().trunc_subsecs(6);
        let comment = Comment::new(
            CommentId::random(),
            *post_id,
            body,
            Author::from(actor),
            now,
            now,
        );
        self.comments
            .insert(&comment)
            .await
            .map_err(map_repository_error)?;
        info!(
            comment_id = %comment.id(),
            post_id = %post_id,
            user_id = %actor.id(),
            "comment created"
        );
        Ok(comment)
    }

    async fn update(
        &self,
        actor: Option<&User>,
        id: &CommentId,
        content: String,
    ) -> Result<Comment, Error> {
        require_actor(actor)?;
        let existing = self.load(id).await?;
        ensure_owner(actor, existing.author().id(), "comment", id)?;
        let body = CommentBody::new(content)?;
        let updated_at = self.clock.utc().trunc_subsecs(6);
        let comment = self
            .comments
            .update(id, &body, updated_at)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| comment_not_found(id))?;
        info!(comment_id = %id, "comment updated");
        Ok(comment)
    }

    async fn delete(&self, actor: Option<&User>, id: &CommentId) -> Result<(), Error> {
        require_actor(actor)?;
        let existing = self.load(id).await?;
        ensure_owner(actor, existing.author().id(), "comment", id)?;
        let deleted = self
            .comments
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(comment_not_found(id));
        }
        info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "comment_service_tests.rs"]
mod tests;
