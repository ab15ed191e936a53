//! Wallet
//!
//! The payment ledger: wallet balances, coin conversion and recorded
//! gateway payments, with an append-only transaction log. Every operation
//! is one atomic database transaction conditioned on the appointment still
//! being unpaid at commit time.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::WalletServiceError;
pub use service::*;
