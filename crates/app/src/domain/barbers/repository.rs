//! Barbers Repository

use chairtime::schedule::WeeklyAvailability;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    barbers::models::{Barber, BarberUuid, NewBarber},
    shops::models::ShopUuid,
    users::models::UserUuid,
};

const CREATE_BARBER_SQL: &str = include_str!("sql/create_barber.sql");
const GET_BARBER_SQL: &str = include_str!("sql/get_barber.sql");
const UPDATE_AVAILABILITY_SQL: &str = include_str!("sql/update_availability.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBarbersRepository;

impl PgBarbersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_barber(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: &NewBarber,
    ) -> Result<Barber, sqlx::Error> {
        query_as::<Postgres, Barber>(CREATE_BARBER_SQL)
            .bind(barber.uuid.into_uuid())
            .bind(shop.into_uuid())
            .bind(&barber.display_name)
            .bind(barber.user_uuid.map(UserUuid::into_uuid))
            .bind(Json(&barber.availability))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_barber(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
    ) -> Result<Barber, sqlx::Error> {
        query_as::<Postgres, Barber>(GET_BARBER_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
        availability: &WeeklyAvailability,
    ) -> Result<Barber, sqlx::Error> {
        query_as::<Postgres, Barber>(UPDATE_AVAILABILITY_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .bind(Json(availability))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Barber {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(availability) = row.try_get::<Json<WeeklyAvailability>, _>("availability")?;

        Ok(Self {
            uuid: BarberUuid::from_uuid(row.try_get("uuid")?),
            display_name: row.try_get("display_name")?,
            user_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            availability,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
