//! Appointments service errors.

use chairtime::appointments::InvalidTransition;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Postgres exclusion-constraint violation; raised by the no-double-booking
/// constraint when two bookings race past the overlap pre-check.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Debug, Error)]
pub enum AppointmentsServiceError {
    #[error("appointment not found")]
    NotFound,

    #[error("appointment already exists")]
    AlreadyExists,

    #[error("requested time is no longer available")]
    SlotTaken,

    #[error("related resource not found")]
    InvalidReference,

    #[error("appointment start is out of range")]
    InvalidStart,

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("only completed appointments can be rated")]
    NotRateable,

    #[error("rating must be between 1 and 5")]
    InvalidRating,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AppointmentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if let Some(db_error) = error.as_database_error() {
            if db_error.code().as_deref() == Some(EXCLUSION_VIOLATION) {
                return Self::SlotTaken;
            }
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation) => Self::InvalidStart,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
