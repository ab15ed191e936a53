//! Shops service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopsServiceError {
    #[error("shop already exists")]
    AlreadyExists,

    #[error("shop not found")]
    NotFound,

    #[error("unknown timezone `{0}`")]
    InvalidTimezone(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ShopsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
