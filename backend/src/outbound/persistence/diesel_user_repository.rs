//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoredUser, UniqueField, UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserId, Username};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match violated_constraint(&error, DatabaseErrorKind::UniqueViolation) {
        Some(EMAIL_CONSTRAINT) => return UserPersistenceError::duplicate(UniqueField::Email),
        Some(USERNAME_CONSTRAINT) => {
            return UserPersistenceError::duplicate(UniqueField::Username);
        }
        Some(other) => warn!(constraint = other, "unrecognised unique violation on users"),
        None => {}
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain user and its hash.
fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let UserRow {
        id,
        email,
        username,
        password_hash,
        created_at,
    } = row;
    let email = Email::new(email).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let username =
        Username::new(username).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    Ok(StoredUser {
        user: User::new(UserId::from_uuid(id), email, username, created_at),
        password_hash: PasswordHash::from_stored(password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_stored_user(row).map(|stored| stored.user))
            .transpose()
    }

    async fn find_for_login(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(identifier).or(users::username.eq(identifier)))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored_user).transpose()
    }

    async fn find_conflict(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<UniqueField>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let taken: Vec<(String, String)> = users::table
            .filter(
                users::email
                    .eq(email.as_ref())
                    .or(users::username.eq(username.as_ref())),
            )
            .select((users::email, users::username))
            .limit(2)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if taken.iter().any(|(taken_email, _)| taken_email == email.as_ref()) {
            return Ok(Some(UniqueField::Email));
        }
        Ok((!taken.is_empty()).then_some(UniqueField::Username))
    }

    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            username: user.username().as_ref(),
            password_hash: password_hash.as_str(),
            created_at: user.created_at(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for user error mapping and row conversion.
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::super::diesel_basic_error_mapping::fixtures::database_error;
    use super::*;

    fn row(email: &str, username: &str) -> UserRow {
        UserRow {
            id: Uuid::from_u128(1),
            email: email.to_owned(),
            username: username.to_owned(),
            password_hash: "$2b$04$hash".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("time"),
        }
    }

    #[rstest]
    #[case(EMAIL_CONSTRAINT, UniqueField::Email)]
    #[case(USERNAME_CONSTRAINT, UniqueField::Username)]
    fn unique_violations_name_the_taken_field(
        #[case] constraint: &'static str,
        #[case] field: UniqueField,
    ) {
        let error = database_error(DatabaseErrorKind::UniqueViolation, Some(constraint));
        assert_eq!(
            map_diesel_error(error),
            UserPersistenceError::duplicate(field)
        );
    }

    #[rstest]
    fn unknown_unique_violation_is_a_query_error() {
        let error = database_error(DatabaseErrorKind::UniqueViolation, Some("users_pkey"));
        assert!(matches!(
            map_diesel_error(error),
            UserPersistenceError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, UserPersistenceError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn rows_convert_into_users() {
        let stored = row_to_stored_user(row("ada@example.com", "ada_l")).expect("valid row");
        assert_eq!(stored.user.username().as_ref(), "ada_l");
        assert_eq!(stored.password_hash.as_str(), "$2b$04$hash");
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let error = row_to_stored_user(row("not-an-email", "ada_l")).expect_err("corrupt");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
