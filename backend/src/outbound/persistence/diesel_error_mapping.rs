//! Shared Diesel error classification for the record repositories.
//!
//! Repositories turn a [`DieselFailure`] into their own port error, so key
//! and reference violations surface as domain outcomes rather than opaque
//! query failures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage-level outcome of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A primary key or unique constraint rejected the write.
    UniqueViolation,
    /// A foreign key did not resolve.
    ForeignKeyViolation { constraint: Option<String> },
    /// The connection was lost mid-operation.
    Connection(&'static str),
    /// Any other failure.
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
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
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation,
            DatabaseErrorKind::ForeignKeyViolation => DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                DieselFailure::Connection("database connection error")
            }
            _ => DieselFailure::Query("database error"),
        },
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint failed".to_owned()))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), DieselFailure::UniqueViolation)]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        DieselFailure::ForeignKeyViolation { constraint: None }
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        DieselFailure::Connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation),
        DieselFailure::Query("database error")
    )]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found"))]
    fn classifies_diesel_errors(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(
            pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
        assert_eq!(pool_error_message(PoolError::build("bad url")), "bad url");
    }
}
