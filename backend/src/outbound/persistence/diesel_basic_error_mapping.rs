//! Shared Diesel error classification for the repositories.
//!
//! Repositories translate the coarse classes below into their own port error
//! variants. Database messages are logged at debug level and never forwarded.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse failure class of a Diesel error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// The server closed the connection.
    Connection,
    /// Anything else: bad SQL, check constraints, decoding failures.
    Query,
}

impl DieselFailure {
    /// Stable, client-safe description of the class.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::UniqueViolation => "unique constraint violated",
            Self::Connection => "database connection error",
            Self::Query => "database error",
        }
    }
}

/// Classify `error`, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: &DieselError, operation: &str) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        _ => DieselFailure::Query,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo("boom")))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), DieselFailure::UniqueViolation)]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), DieselFailure::Connection)]
    #[case(database_error(DatabaseErrorKind::CheckViolation), DieselFailure::Query)]
    #[case(DieselError::NotFound, DieselFailure::Query)]
    fn classifies_errors(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(&error, "test"), expected);
    }

    #[rstest]
    fn descriptions_do_not_leak_database_detail() {
        let failure = classify_diesel_error(
            &database_error(DatabaseErrorKind::CheckViolation),
            "test",
        );
        assert!(!failure.describe().contains("boom"));
    }
}
