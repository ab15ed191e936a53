//! Wallet Vocabulary & Coin Conversion
//!
//! Shared money vocabulary for the ledger: transaction kinds, gateway rails,
//! the payee settlement policy and the fixed coin exchange arithmetic.
//! Amounts are whole PKR units; ledger entries carry signed amounts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coins consumed per conversion batch.
pub const COINS_PER_CONVERSION: u64 = 1000;

/// Wallet units credited per conversion batch.
pub const CREDIT_PER_CONVERSION: u64 = 5;

/// Wallet units credited for converting `coins`, flooring the remainder.
///
/// The rate is fixed at [`CREDIT_PER_CONVERSION`] units per
/// [`COINS_PER_CONVERSION`] coins (0.005 units per coin). The full coin
/// amount is debited regardless of the flooring; callers reject requests
/// that would credit nothing so coins are never burned for zero value.
#[must_use]
pub const fn coins_to_wallet_credit(coins: u64) -> u64 {
    coins.saturating_mul(CREDIT_PER_CONVERSION) / COINS_PER_CONVERSION
}

/// Kind of an append-only wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionKind {
    /// Coins converted into wallet balance.
    TopUp,

    /// Money leaving the payer's side of the ledger.
    PaymentSent,

    /// Money arriving on the payee's side of the ledger.
    PaymentReceived,
}

impl WalletTransactionKind {
    /// Stable text form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "top_up",
            Self::PaymentSent => "payment_sent",
            Self::PaymentReceived => "payment_received",
        }
    }
}

impl fmt::Display for WalletTransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletTransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "top_up" => Ok(Self::TopUp),
            "payment_sent" => Ok(Self::PaymentSent),
            "payment_received" => Ok(Self::PaymentReceived),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

/// External payment rail whose confirmation is recorded, never performed,
/// by this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMethod {
    /// `JazzCash` mobile wallet.
    JazzCash,

    /// `EasyPaisa` mobile wallet.
    EasyPaisa,
}

impl GatewayMethod {
    /// Stable text form used in storage and ledger descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JazzCash => "jazzcash",
            Self::EasyPaisa => "easypaisa",
        }
    }
}

impl fmt::Display for GatewayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayMethod {
    type Err = UnknownGatewayMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "jazzcash" => Ok(Self::JazzCash),
            "easypaisa" => Ok(Self::EasyPaisa),
            other => Err(UnknownGatewayMethod(other.to_string())),
        }
    }
}

/// What happens to the barber's side of a successful payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayoutPolicy {
    /// Append the payee's `payment_received` entry only; settlement happens
    /// out of band (periodic payout).
    #[default]
    RecordOnly,

    /// Additionally credit the payee's wallet balance immediately.
    CreditWallet,
}

/// Text that does not name a [`WalletTransactionKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wallet transaction kind `{0}`")]
pub struct UnknownTransactionKind(pub String);

/// Text that does not name a [`GatewayMethod`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gateway method `{0}`")]
pub struct UnknownGatewayMethod(pub String);
