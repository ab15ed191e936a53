//! Wallet Repository

use chairtime::wallet::WalletTransactionKind;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    shops::models::ShopUuid,
    users::{models::UserUuid, repository::try_get_unsigned},
    wallet::models::{WalletBalances, WalletTransaction, WalletTransactionUuid},
};

const GET_BALANCES_SQL: &str = include_str!("sql/get_balances.sql");
const DEBIT_WALLET_SQL: &str = include_str!("sql/debit_wallet.sql");
const CREDIT_WALLET_SQL: &str = include_str!("sql/credit_wallet.sql");
const CONVERT_COINS_SQL: &str = include_str!("sql/convert_coins.sql");
const APPEND_ENTRY_SQL: &str = include_str!("sql/append_entry.sql");
const LIST_ENTRIES_SQL: &str = include_str!("sql/list_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWalletRepository;

impl PgWalletRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_balances(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<WalletBalances, sqlx::Error> {
        query_as::<Postgres, WalletBalances>(GET_BALANCES_SQL)
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Debit the wallet, guarded in SQL so the balance can never go
    /// negative. `None` means the guard refused the update.
    pub(crate) async fn debit_wallet(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
        amount: u64,
    ) -> Result<Option<WalletBalances>, sqlx::Error> {
        query_as::<Postgres, WalletBalances>(DEBIT_WALLET_SQL)
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .bind(try_into_amount(amount)?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn credit_wallet(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
        amount: u64,
    ) -> Result<Option<WalletBalances>, sqlx::Error> {
        query_as::<Postgres, WalletBalances>(CREDIT_WALLET_SQL)
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .bind(try_into_amount(amount)?)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Debit coins and credit the converted wallet amount in one statement,
    /// guarded so the coin balance can never go negative.
    pub(crate) async fn convert_coins(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
        coins: u64,
        credit: u64,
    ) -> Result<Option<WalletBalances>, sqlx::Error> {
        query_as::<Postgres, WalletBalances>(CONVERT_COINS_SQL)
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .bind(try_into_amount(coins)?)
            .bind(try_into_amount(credit)?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn append_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
        kind: WalletTransactionKind,
        amount: i64,
        description: &str,
    ) -> Result<WalletTransaction, sqlx::Error> {
        query_as::<Postgres, WalletTransaction>(APPEND_ENTRY_SQL)
            .bind(WalletTransactionUuid::new().into_uuid())
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .bind(kind.as_str())
            .bind(amount)
            .bind(description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        user: UserUuid,
    ) -> Result<Vec<WalletTransaction>, sqlx::Error> {
        query_as::<Postgres, WalletTransaction>(LIST_ENTRIES_SQL)
            .bind(shop.into_uuid())
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for WalletBalances {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            wallet_balance: try_get_unsigned(row, "wallet_balance")?,
            coins: try_get_unsigned(row, "coins")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WalletTransaction {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        Ok(Self {
            uuid: WalletTransactionUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            kind: kind.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

fn try_into_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
