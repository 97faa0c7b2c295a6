//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Listings are keyset queries over `(created_at, id)` descending, served by
//! the `posts_created_at_id_idx` index. Author usernames are joined on read
//! and comment counts come from a grouped count over the page's ids.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{
    Author, ListingRequest, Post, PostContent, PostDraft, PostFilter, PostId, PostSummary,
    PostTitle, UserId, Username,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

/// Rows to fetch for `request`: one beyond the page to detect a next page.
pub(super) fn fetch_limit(request: &ListingRequest) -> i64 {
    i64::try_from(request.size().get().saturating_add(1)).unwrap_or(i64::MAX)
}

fn corrupt(err: impl ToString) -> PostPersistenceError {
    PostPersistenceError::query(err.to_string())
}

fn row_to_post(
    row: PostRow,
    username: String,
    comment_count: i64,
) -> Result<Post, PostPersistenceError> {
    let PostRow {
        id,
        author_id,
        title,
        content,
        created_at,
        updated_at,
    } = row;
    let draft = PostDraft::new(
        PostTitle::new(title).map_err(corrupt)?,
        PostContent::new(content).map_err(corrupt)?,
    );
    let author = Author::new(
        UserId::from_uuid(author_id),
        Username::new(username).map_err(corrupt)?,
    );
    Ok(Post::new(
        PostId::from_uuid(id),
        draft,
        author,
        created_at,
        updated_at,
        u64::try_from(comment_count).unwrap_or_default(),
    ))
}

async fn comment_counts(
    conn: &mut AsyncPgConnection,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, diesel::result::Error> {
    let counts: Vec<(Uuid, i64)> = comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count_star()))
        .load(conn)
        .await?;
    Ok(counts.into_iter().collect())
}

async fn load_post(
    conn: &mut AsyncPgConnection,
    id: &PostId,
) -> Result<Option<Post>, PostPersistenceError> {
    let row: Option<(PostRow, String)> = posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id.as_uuid()))
        .select((PostRow::as_select(), users::username))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    let Some((row, username)) = row else {
        return Ok(None);
    };
    let count: i64 = comments::table
        .filter(comments::post_id.eq(id.as_uuid()))
        .count()
        .get_result(conn)
        .await
        .map_err(map_diesel_error)?;
    row_to_post(row, username, count).map(Some)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn list(
        &self,
        filter: &PostFilter,
        request: &ListingRequest,
    ) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), users::username))
            .into_boxed();
        if let Some(author) = filter.author {
            query = query.filter(posts::author_id.eq(*author.as_uuid()));
        }
        if let Some(term) = &filter.search {
            let pattern = term.like_pattern();
            query = query.filter(
                posts::title
                    .ilike(pattern.clone())
                    .or(posts::content.ilike(pattern.clone()))
                    .or(users::username.ilike(pattern)),
            );
        }
        if let Some(anchor) = request.anchor() {
            let created_at = anchor.created_at();
            query = query.filter(
                posts::created_at.lt(created_at).or(posts::created_at
                    .eq(created_at)
                    .and(posts::id.lt(*anchor.id()))),
            );
        }

        let rows: Vec<(PostRow, String)> = query
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(fetch_limit(request))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|(row, _)| row.id).collect();
        let counts = comment_counts(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, username)| {
                let count = counts.get(&row.id).copied().unwrap_or_default();
                row_to_post(row, username, count).map(PostSummary::from)
            })
            .collect()
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_post(&mut conn, id).await
    }

    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPostRow {
            id: *post.id().as_uuid(),
            author_id: *post.author().id().as_uuid(),
            title: post.title().as_ref(),
            content: post.content().as_ref(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        };
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: &PostId,
        draft: &PostDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = PostUpdate {
            title: draft.title().as_ref(),
            content: draft.content().as_ref(),
            updated_at,
        };
        let updated = diesel::update(posts::table.find(*id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_post(&mut conn, id).await
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Comments go with the post via `ON DELETE CASCADE`.
        diesel::delete(posts::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }
}
