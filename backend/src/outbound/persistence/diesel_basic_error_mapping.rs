//! Shared Diesel error mapping for the forum repositories.
//!
//! Each repository keeps its own `map_diesel_error` that first checks for
//! the constraint violations it understands, then falls back to
//! [`map_basic_diesel_error`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Name of the constraint `error` violated, when it is a `kind` violation.
pub(super) fn violated_constraint(error: &DieselError, kind: DatabaseErrorKind) -> Option<&str> {
    match error {
        DieselError::DatabaseError(actual, info)
            if std::mem::discriminant(actual) == std::mem::discriminant(&kind) =>
        {
            info.constraint_name()
        }
        _ => None,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Driver messages are logged at debug level only; the returned error
/// carries a fixed description.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}


#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::fixtures::database_error;
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_basic_pool_error(PoolError::checkout("refused"), |message| message);
        assert_eq!(mapped, "refused");
    }

    #[rstest]
    #[case(DieselError::NotFound, Mapped::Query("record not found"))]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        Mapped::Connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, Some("users_email_key")),
        Mapped::Query("database error")
    )]
    fn diesel_errors_map_to_fixed_messages(#[case] error: DieselError, #[case] expected: Mapped) {
        assert_eq!(map(error), expected);
    }

    #[rstest]
    fn constraint_is_reported_only_for_the_requested_kind() {
        let error = database_error(DatabaseErrorKind::UniqueViolation, Some("users_email_key"));
        assert_eq!(
            violated_constraint(&error, DatabaseErrorKind::UniqueViolation),
            Some("users_email_key")
        );
        assert_eq!(
            violated_constraint(&error, DatabaseErrorKind::ForeignKeyViolation),
            None
        );
    }
}
