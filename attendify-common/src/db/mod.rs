//! Database access layer for Attendify

pub mod init;
pub mod models;

pub use init::init_database;

/// Whether an sqlx error is a UNIQUE-constraint violation
///
/// Uniqueness constraints are the arbiter for check-then-insert races on
/// the roster and attendance tables; callers map violations to conflict
/// errors rather than generic database failures.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
