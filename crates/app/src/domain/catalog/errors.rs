//! Catalog service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("service already exists")]
    AlreadyExists,

    #[error("service not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid price value")]
    InvalidPrice(#[from] TryFromIntError),

    #[error("service duration must be between 1 minute and 1 day")]
    InvalidDuration,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation) => Self::InvalidDuration,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
