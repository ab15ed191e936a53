//! Shops Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::shops::models::{NewShop, Shop, ShopUuid};

const CREATE_SHOP_SQL: &str = include_str!("sql/create_shop.sql");
const GET_SHOP_SQL: &str = include_str!("sql/get_shop.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShopsRepository;

impl PgShopsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: &NewShop,
    ) -> Result<Shop, sqlx::Error> {
        query_as::<Postgres, Shop>(CREATE_SHOP_SQL)
            .bind(shop.uuid.into_uuid())
            .bind(&shop.name)
            .bind(&shop.timezone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_shop(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<Shop, sqlx::Error> {
        query_as::<Postgres, Shop>(GET_SHOP_SQL)
            .bind(shop.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Shop {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ShopUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            timezone: row.try_get("timezone")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
