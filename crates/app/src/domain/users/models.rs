//! User Models

use jiff::Timestamp;

use crate::ids::Id;

/// User UUID
pub type UserUuid = Id<User>;

/// A customer or staff member of one shop.
///
/// `wallet_balance` and `coins` are owned by the wallet service: nothing
/// else may write them, and all mutations happen inside its transactions.
#[derive(Debug, Clone)]
pub struct User {
    pub uuid: UserUuid,
    pub display_name: String,

    /// Spendable balance in whole PKR units.
    pub wallet_balance: u64,

    /// Loyalty coins convertible to wallet balance at a fixed rate.
    pub coins: u64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New User Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub display_name: String,

    /// Opening wallet balance, e.g. from an import or an admin grant.
    pub wallet_balance: u64,

    /// Opening coin balance.
    pub coins: u64,
}
