//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    barbers::models::BarberUuid,
    catalog::models::{NewService, Service, ServiceUpdate, ServiceUuid},
    shops::models::ShopUuid,
    users::repository::try_get_unsigned,
};

const CREATE_SERVICE_SQL: &str = include_str!("sql/create_service.sql");
const GET_SERVICE_SQL: &str = include_str!("sql/get_service.sql");
const LIST_SERVICES_SQL: &str = include_str!("sql/list_services.sql");
const UPDATE_SERVICE_SQL: &str = include_str!("sql/update_service.sql");
const DELETE_SERVICE_SQL: &str = include_str!("sql/delete_service.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        service: &NewService,
    ) -> Result<Service, sqlx::Error> {
        query_as::<Postgres, Service>(CREATE_SERVICE_SQL)
            .bind(service.uuid.into_uuid())
            .bind(shop.into_uuid())
            .bind(service.barber_uuid.into_uuid())
            .bind(&service.name)
            .bind(try_into_amount(service.price)?)
            .bind(service.duration_minutes)
            .bind(service.description.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<Service, sqlx::Error> {
        query_as::<Postgres, Service>(GET_SERVICE_SQL)
            .bind(shop.into_uuid())
            .bind(service.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_services(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Vec<Service>, sqlx::Error> {
        query_as::<Postgres, Service>(LIST_SERVICES_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        service: ServiceUuid,
        update: &ServiceUpdate,
    ) -> Result<Service, sqlx::Error> {
        query_as::<Postgres, Service>(UPDATE_SERVICE_SQL)
            .bind(shop.into_uuid())
            .bind(service.into_uuid())
            .bind(&update.name)
            .bind(try_into_amount(update.price)?)
            .bind(update.duration_minutes)
            .bind(update.description.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        service: ServiceUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SERVICE_SQL)
            .bind(shop.into_uuid())
            .bind(service.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Service {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let duration_minutes: i32 = row.try_get("duration_minutes")?;

        Ok(Self {
            uuid: ServiceUuid::from_uuid(row.try_get("uuid")?),
            barber_uuid: BarberUuid::from_uuid(row.try_get("barber_uuid")?),
            name: row.try_get("name")?,
            price: try_get_unsigned(row, "price")?,
            duration_minutes: i64::from(duration_minutes),
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

fn try_into_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
