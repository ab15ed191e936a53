//! Wallet Models

use chairtime::wallet::WalletTransactionKind;
use jiff::Timestamp;
use serde::Serialize;

use crate::{
    domain::{appointments::models::Appointment, users::models::UserUuid},
    ids::Id,
};

/// Wallet Transaction UUID
pub type WalletTransactionUuid = Id<WalletTransaction>;

/// One append-only ledger entry. Written exactly once per successful
/// operation; never updated or deleted.
#[derive(Debug, Clone)]
pub struct WalletTransaction {
    pub uuid: WalletTransactionUuid,
    pub user_uuid: UserUuid,
    pub kind: WalletTransactionKind,

    /// Signed amount in whole PKR units: negative for money leaving the
    /// user's side, positive for money arriving.
    pub amount: i64,

    pub description: String,
    pub created_at: Timestamp,
}

/// A user's balances as of the transaction that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletBalances {
    pub wallet_balance: u64,
    pub coins: u64,
}

/// Confirmation handed back by an external gateway. This system records
/// the outcome; it never performs the charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The gateway approved the charge under the given reference.
    Approved { reference: String },

    /// The gateway declined; nothing is written.
    Declined,
}

/// Authoritative state handed back by a successful payment, saving the
/// caller a re-fetch.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub appointment: Appointment,
    pub payer_balances: WalletBalances,
}

/// Authoritative state handed back by a successful coin conversion.
#[derive(Debug, Clone)]
pub struct TopUpReceipt {
    pub balances: WalletBalances,

    /// Wallet units credited for the converted coins.
    pub credited: u64,
}
