//! Port abstraction for user persistence adapters and their errors.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Email, PasswordHash, User, UserId, Username};

use super::define_port_error;

/// Uniquely constrained user column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `users.email`.
    Email,
    /// `users.username`.
    Username,
}

impl UniqueField {
    /// Request field name reported to clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert hit a unique constraint.
        Duplicate { field: UniqueField } => "user {field} already taken",
    }
}

/// A user together with their stored credential, for login only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Public user record.
    pub user: User,
    /// Stored password hash.
    pub password_hash: PasswordHash,
}

/// Driven port for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and credential by exact email or username.
    async fn find_for_login(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Report which unique field, email first, is already taken.
    async fn find_conflict(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<UniqueField>, UserPersistenceError>;

    /// Insert a new user with their credential.
    ///
    /// Returns [`UserPersistenceError::Duplicate`] when a unique constraint
    /// rejects the row.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;
}
