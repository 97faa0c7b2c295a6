//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.
//!
//! Listings scan `comments_post_created_at_id_idx` oldest first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{
    Author, Comment, CommentBody, CommentId, ListingRequest, PostId, UserId, Username,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::diesel_post_repository::fetch_limit;
use super::models::{CommentRow, CommentUpdate, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

const POST_CONSTRAINT: &str = "comments_post_id_fkey";

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_basic_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

/// Insert failures: a vanished parent post is reported as such.
fn map_insert_error(error: diesel::result::Error, post_id: PostId) -> CommentPersistenceError {
    match violated_constraint(&error, DatabaseErrorKind::ForeignKeyViolation) {
        Some(POST_CONSTRAINT) => return CommentPersistenceError::missing_post(post_id),
        Some(other) => warn!(constraint = other, "unrecognised foreign key violation on comments"),
        None => {}
    }
    map_diesel_error(error)
}

fn row_to_comment(row: CommentRow, username: String) -> Result<Comment, CommentPersistenceError> {
    let CommentRow {
        id,
        post_id,
        author_id,
        content,
        created_at,
        updated_at,
    } = row;
    let body =
        CommentBody::new(content).map_err(|err| CommentPersistenceError::query(err.to_string()))?;
    let username =
        Username::new(username).map_err(|err| CommentPersistenceError::query(err.to_string()))?;
    Ok(Comment::new(
        CommentId::from_uuid(id),
        PostId::from_uuid(post_id),
        body,
        Author::new(UserId::from_uuid(author_id), username),
        created_at,
        updated_at,
    ))
}

async fn load_comment(
    conn: &mut AsyncPgConnection,
    id: &CommentId,
) -> Result<Option<Comment>, CommentPersistenceError> {
    let row: Option<(CommentRow, String)> = comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id.as_uuid()))
        .select((CommentRow::as_select(), users::username))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(|(row, username)| row_to_comment(row, username))
        .transpose()
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list(
        &self,
        post_id: &PostId,
        request: &ListingRequest,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(*post_id.as_uuid()))
            .select((CommentRow::as_select(), users::username))
            .into_boxed();
        if let Some(anchor) = request.anchor() {
            let created_at = anchor.created_at();
            query = query.filter(
                comments::created_at.gt(created_at).or(comments::created_at
                    .eq(created_at)
                    .and(comments::id.gt(*anchor.id()))),
            );
        }

        let rows: Vec<(CommentRow, String)> = query
            .order((comments::created_at.asc(), comments::id.asc()))
            .limit(fetch_limit(request))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, username)| row_to_comment(row, username))
            .collect()
    }

    async fn find_by_id(
        &self,
        id: &CommentId,
    ) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_comment(&mut conn, id).await
    }

    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCommentRow {
            id: *comment.id().as_uuid(),
            post_id: *comment.post_id().as_uuid(),
            author_id: *comment.author().id().as_uuid(),
            content: comment.content().as_ref(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, *comment.post_id()))
    }

    async fn update(
        &self,
        id: &CommentId,
        content: &CommentBody,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = CommentUpdate {
            content: content.as_ref(),
            updated_at,
        };
        let updated = diesel::update(comments::table.find(*id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_comment(&mut conn, id).await
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(comments::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|deleted| deleted > 0)
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for comment error mapping.
    use rstest::rstest;

    use super::super::diesel_basic_error_mapping::fixtures::database_error;
    use super::*;

    #[rstest]
    fn missing_parent_post_is_reported() {
        let post_id = PostId::random();
        let error = database_error(DatabaseErrorKind::ForeignKeyViolation, Some(POST_CONSTRAINT));
        assert_eq!(
            map_insert_error(error, post_id),
            CommentPersistenceError::missing_post(post_id)
        );
    }

    #[rstest]
    #[case::author_fk(DatabaseErrorKind::ForeignKeyViolation, Some("comments_author_id_fkey"))]
    #[case::unique(DatabaseErrorKind::UniqueViolation, Some(POST_CONSTRAINT))]
    fn other_insert_failures_are_query_errors(
        #[case] kind: DatabaseErrorKind,
        #[case] constraint: Option<&'static str>,
    ) {
        let error = database_error(kind, constraint);
        assert!(matches!(
            map_insert_error(error, PostId::random()),
            CommentPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn blank_stored_content_is_a_query_error() {
        let at = chrono::Utc::now();
        let row = CommentRow {
            id: uuid::Uuid::from_u128(1),
            post_id: uuid::Uuid::from_u128(2),
            author_id: uuid::Uuid::from_u128(3),
            content: "   ".to_owned(),
            created_at: at,
            updated_at: at,
        };
        assert!(row_to_comment(row, "ada_l".to_owned()).is_err());
    }
}
