//! Wallet service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletServiceError {
    #[error("appointment or user not found")]
    NotFound,

    #[error("appointment is already paid")]
    AlreadyPaid,

    #[error("wallet balance is too low")]
    InsufficientBalance,

    #[error("coin balance is too low")]
    InsufficientCoins,

    #[error("amount is not convertible")]
    InvalidAmount,

    #[error("payment gateway declined the charge")]
    GatewayDeclined,

    #[error("transaction kept conflicting with concurrent payments")]
    Conflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WalletServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Postgres codes for serialization failure and deadlock detection, the two
/// shapes transaction contention takes here.
const RETRYABLE_CODES: [&str; 2] = ["40001", "40P01"];

/// Whether the operation lost a race and is worth retrying wholesale.
pub(crate) fn is_retryable(error: &WalletServiceError) -> bool {
    let WalletServiceError::Sql(sql_error) = error else {
        return false;
    };

    sql_error
        .as_database_error()
        .and_then(DatabaseError::code)
        .is_some_and(|code| RETRYABLE_CODES.contains(&code.as_ref()))
}
