//! Concrete repository implementations.

pub mod attribute;
pub mod audit;
pub mod category;
pub mod item;
pub mod location;
pub mod stock;
pub mod transaction;
pub mod transfer;
pub mod user;

use warehouse_core::error::{AppError, ErrorKind};

/// PostgreSQL `unique_violation` SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `foreign_key_violation` SQLSTATE.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error to an [`AppError`], turning constraint violations into
/// `Conflict` so callers can report them to users.
pub(crate) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let code = e
            .as_database_error()
            .and_then(|d| d.code())
            .map(|c| c.into_owned());
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => {
                AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), e)
            }
            Some(FOREIGN_KEY_VIOLATION) => AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: referenced record is missing or still in use"),
                e,
            ),
            _ => AppError::with_source(ErrorKind::Database, context, e),
        }
    }
}
