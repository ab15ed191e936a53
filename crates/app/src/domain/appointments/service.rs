//! Appointments service.

use async_trait::async_trait;
use chairtime::appointments::AppointmentStatus;
use jiff::{Span, Timestamp};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        appointments::{
            errors::AppointmentsServiceError,
            models::{Appointment, AppointmentUuid, NewAppointment},
            repository::PgAppointmentsRepository,
        },
        barbers::models::BarberUuid,
        catalog::repository::PgCatalogRepository,
        shops::models::ShopUuid,
    },
};

/// Ratings are 1–5 stars.
const RATING_RANGE: std::ops::RangeInclusive<i16> = 1..=5;

#[derive(Debug, Clone)]
pub struct PgAppointmentsService {
    db: Db,
    repository: PgAppointmentsRepository,
    catalog: PgCatalogRepository,
}

impl PgAppointmentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAppointmentsRepository::new(),
            catalog: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl AppointmentsService for PgAppointmentsService {
    #[tracing::instrument(
        name = "appointments.service.book_appointment",
        skip(self, appointment),
        fields(
            shop_uuid = %shop,
            appointment_uuid = %appointment.uuid,
            barber_uuid = %appointment.barber_uuid
        ),
        err
    )]
    async fn book_appointment(
        &self,
        shop: ShopUuid,
        appointment: NewAppointment,
    ) -> Result<Appointment, AppointmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let service = self
            .catalog
            .get_service(&mut tx, shop, appointment.service_uuid)
            .await?;

        if service.barber_uuid != appointment.barber_uuid {
            return Err(AppointmentsServiceError::InvalidReference);
        }

        let duration = Span::new()
            .try_minutes(service.duration_minutes)
            .map_err(|_| AppointmentsServiceError::InvalidStart)?;

        let ends_at = appointment
            .starts_at
            .checked_add(duration)
            .map_err(|_| AppointmentsServiceError::InvalidStart)?;

        // A slot shown to the customer may have been taken since it was
        // computed; booking is where that race is settled. The exclusion
        // constraint backs this check up if two inserts slip past it.
        let clashes = self
            .repository
            .lock_overlapping(&mut tx, shop, appointment.barber_uuid, appointment.starts_at, ends_at)
            .await?;

        if !clashes.is_empty() {
            return Err(AppointmentsServiceError::SlotTaken);
        }

        let created = self
            .repository
            .create_appointment(&mut tx, shop, &appointment, &service, ends_at)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_appointment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
    ) -> Result<Appointment, AppointmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self
            .repository
            .get_appointment(&mut tx, shop, appointment)
            .await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_for_barber(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Appointment>, AppointmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let appointments = self
            .repository
            .list_for_barber(&mut tx, shop, barber, from, to)
            .await?;

        tx.commit().await?;

        Ok(appointments)
    }

    async fn update_status(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        next: AppointmentStatus,
    ) -> Result<Appointment, AppointmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .repository
            .get_appointment_for_update(&mut tx, shop, appointment)
            .await?;

        let next = current.status.transition_to(next)?;

        let updated = self
            .repository
            .update_status(&mut tx, shop, appointment, next)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn rate_appointment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        rating: i16,
        review: Option<String>,
    ) -> Result<Appointment, AppointmentsServiceError> {
        if !RATING_RANGE.contains(&rating) {
            return Err(AppointmentsServiceError::InvalidRating);
        }

        let mut tx = self.db.begin().await?;

        let current = self
            .repository
            .get_appointment_for_update(&mut tx, shop, appointment)
            .await?;

        if current.status != AppointmentStatus::Completed {
            return Err(AppointmentsServiceError::NotRateable);
        }

        let updated = self
            .repository
            .set_rating(&mut tx, shop, appointment, rating, review.as_deref())
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Appointment persistence operations.
pub trait AppointmentsService: Send + Sync {
    /// Book a service with a barber, snapshotting the catalog price and
    /// duration and re-validating the requested interval.
    async fn book_appointment(
        &self,
        shop: ShopUuid,
        appointment: NewAppointment,
    ) -> Result<Appointment, AppointmentsServiceError>;

    /// Retrieve a single appointment.
    async fn get_appointment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
    ) -> Result<Appointment, AppointmentsServiceError>;

    /// A barber's appointments intersecting `[from, to)`, soonest first.
    async fn list_for_barber(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Appointment>, AppointmentsServiceError>;

    /// Move an appointment through its lifecycle.
    async fn update_status(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        next: AppointmentStatus,
    ) -> Result<Appointment, AppointmentsServiceError>;

    /// Leave a 1–5 star rating on a completed appointment.
    async fn rate_appointment(
        &self,
        shop: ShopUuid,
        appointment: AppointmentUuid,
        rating: i16,
        review: Option<String>,
    ) -> Result<Appointment, AppointmentsServiceError>;
}
