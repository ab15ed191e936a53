//! Appointments Repository

use std::str::FromStr;

use chairtime::appointments::AppointmentStatus;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    appointments::models::{Appointment, AppointmentUuid, BookedWindow, NewAppointment},
    barbers::models::BarberUuid,
    catalog::models::Service,
    shops::models::ShopUuid,
    users::{models::UserUuid, repository::try_get_unsigned},
};

const CREATE_APPOINTMENT_SQL: &str = include_str!("sql/create_appointment.sql");
const GET_APPOINTMENT_SQL: &str = include_str!("sql/get_appointment.sql");
const GET_APPOINTMENT_FOR_UPDATE_SQL: &str = include_str!("sql/get_appointment_for_update.sql");
const LIST_FOR_BARBER_SQL: &str = include_str!("sql/list_for_barber.sql");
const LOCK_OVERLAPPING_SQL: &str = include_str!("sql/lock_overlapping.sql");
const BOOKED_WINDOWS_SQL: &str = include_str!("sql/booked_windows.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const SET_RATING_SQL: &str = include_str!("sql/set_rating.sql");
const MARK_PAID_SQL: &str = include_str!("sql/mark_paid.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAppointmentsRepository;

impl PgAppointmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_appointment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: &NewAppointment,
        service: &Service,
        ends_at: Timestamp,
    ) -> Result<Appointment, sqlx::Error> {
        let price = i64::try_from(service.price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, Appointment>(CREATE_APPOINTMENT_SQL)
            .bind(appointment.uuid.into_uuid())
            .bind(shop.into_uuid())
            .bind(appointment.customer_uuid.into_uuid())
            .bind(appointment.barber_uuid.into_uuid())
            .bind(&service.name)
            .bind(price)
            .bind(service.duration_minutes)
            .bind(SqlxTimestamp::from(appointment.starts_at))
            .bind(SqlxTimestamp::from(ends_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_appointment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: AppointmentUuid,
    ) -> Result<Appointment, sqlx::Error> {
        query_as::<Postgres, Appointment>(GET_APPOINTMENT_SQL)
            .bind(shop.into_uuid())
            .bind(appointment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch and row-lock an appointment for the rest of the transaction.
    pub(crate) async fn get_appointment_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: AppointmentUuid,
    ) -> Result<Appointment, sqlx::Error> {
        query_as::<Postgres, Appointment>(GET_APPOINTMENT_FOR_UPDATE_SQL)
            .bind(shop.into_uuid())
            .bind(appointment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_barber(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        query_as::<Postgres, Appointment>(LIST_FOR_BARBER_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(to))
            .fetch_all(&mut **tx)
            .await
    }

    /// Row-lock every slot-holding appointment that intersects
    /// `[starts_at, ends_at)`, returning their ids.
    pub(crate) async fn lock_overlapping(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(LOCK_OVERLAPPING_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .bind(SqlxTimestamp::from(starts_at))
            .bind(SqlxTimestamp::from(ends_at))
            .fetch_all(&mut **tx)
            .await
    }

    /// The slot-holding intervals that intersect `[from, to)` on one
    /// barber's calendar.
    pub(crate) async fn booked_windows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        barber: BarberUuid,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<BookedWindow>, sqlx::Error> {
        query_as::<Postgres, BookedWindow>(BOOKED_WINDOWS_SQL)
            .bind(shop.into_uuid())
            .bind(barber.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(to))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, sqlx::Error> {
        query_as::<Postgres, Appointment>(UPDATE_STATUS_SQL)
            .bind(shop.into_uuid())
            .bind(appointment.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        rating: i16,
        review: Option<&str>,
    ) -> Result<Appointment, sqlx::Error> {
        query_as::<Postgres, Appointment>(SET_RATING_SQL)
            .bind(shop.into_uuid())
            .bind(appointment.into_uuid())
            .bind(rating)
            .bind(review)
            .fetch_one(&mut **tx)
            .await
    }

    /// Conditionally settle the bill: flips `payment_status` to paid only
    /// when it still is not, so a raced second payment updates zero rows.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        amount: u64,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let amount = i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, Appointment>(MARK_PAID_SQL)
            .bind(shop.into_uuid())
            .bind(appointment.into_uuid())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Appointment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let duration_minutes: i32 = row.try_get("duration_minutes")?;

        Ok(Self {
            uuid: AppointmentUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: UserUuid::from_uuid(row.try_get("customer_uuid")?),
            barber_uuid: BarberUuid::from_uuid(row.try_get("barber_uuid")?),
            service_name: row.try_get("service_name")?,
            price: try_get_unsigned(row, "price")?,
            duration_minutes: i64::from(duration_minutes),
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            status: try_get_parsed(row, "status")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            amount_paid: row
                .try_get::<Option<i64>, _>("amount_paid")?
                .map(|paid| {
                    u64::try_from(paid).map_err(|e| sqlx::Error::ColumnDecode {
                        index: "amount_paid".to_string(),
                        source: Box::new(e),
                    })
                })
                .transpose()?,
            rating: row.try_get("rating")?,
            review: row.try_get("review")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for BookedWindow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let duration_minutes: i32 = row.try_get("duration_minutes")?;

        Ok(Self {
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            duration_minutes: i64::from(duration_minutes),
        })
    }
}

/// Decode a text column through its `FromStr` form.
fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.try_get(col)?;

    text.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
