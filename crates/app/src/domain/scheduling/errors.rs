//! Scheduling service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulingServiceError {
    #[error("shop, barber or service not found")]
    NotFound,

    #[error("shop timezone `{0}` is not usable")]
    InvalidTimezone(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SchedulingServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
