//! Scheduling service.

use async_trait::async_trait;
use chairtime::schedule::{BookedInterval, DEFAULT_GRANULARITY_MINUTES, available_slots};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        appointments::repository::PgAppointmentsRepository,
        barbers::{models::BarberUuid, repository::PgBarbersRepository},
        catalog::{models::ServiceUuid, repository::PgCatalogRepository},
        scheduling::{errors::SchedulingServiceError, models::AvailableSlot},
        shops::{models::ShopUuid, repository::PgShopsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgSchedulingService {
    db: Db,
    granularity_minutes: i64,
    shops: PgShopsRepository,
    barbers: PgBarbersRepository,
    catalog: PgCatalogRepository,
    appointments: PgAppointmentsRepository,
}

impl PgSchedulingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            shops: PgShopsRepository::new(),
            barbers: PgBarbersRepository::new(),
            catalog: PgCatalogRepository::new(),
            appointments: PgAppointmentsRepository::new(),
        }
    }

    /// Override the candidate spacing. Mostly useful for shops that book on
    /// a coarser grid than the default.
    #[must_use]
    pub fn with_granularity(mut self, granularity_minutes: i64) -> Self {
        self.granularity_minutes = granularity_minutes;
        self
    }
}

#[async_trait]
impl SchedulingService for PgSchedulingService {
    #[tracing::instrument(
        name = "scheduling.service.available_slots",
        skip(self),
        fields(shop_uuid = %shop, barber_uuid = %barber, service_uuid = %service, %date),
        err
    )]
    async fn available_slots(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        service: ServiceUuid,
        date: Date,
        now: Timestamp,
    ) -> Result<Vec<AvailableSlot>, SchedulingServiceError> {
        let mut tx = self.db.begin().await?;

        let shop_record = self.shops.get_shop(&mut tx, shop).await?;

        let tz = TimeZone::get(&shop_record.timezone)
            .map_err(|_| SchedulingServiceError::InvalidTimezone(shop_record.timezone.clone()))?;

        let barber_record = self.barbers.get_barber(&mut tx, shop, barber).await?;
        let service_record = self.catalog.get_service(&mut tx, shop, service).await?;

        let Some((day_start, day_end)) = day_bounds(date, &tz) else {
            return Ok(Vec::new());
        };

        let windows = self
            .appointments
            .booked_windows(&mut tx, shop, barber, day_start, day_end)
            .await?;

        tx.commit().await?;

        let booked: Vec<BookedInterval> = windows
            .iter()
            .map(|window| BookedInterval {
                start: window.starts_at.to_zoned(tz.clone()).datetime(),
                minutes: window.duration_minutes,
            })
            .collect();

        let slots = available_slots(
            &barber_record.availability,
            date,
            service_record.duration_minutes,
            &booked,
            now.to_zoned(tz.clone()).datetime(),
            self.granularity_minutes,
        );

        Ok(slots
            .iter()
            .filter_map(|slot| {
                let starts_at = slot.start.to_zoned(tz.clone()).ok()?.timestamp();
                let ends_at = slot.end()?.to_zoned(tz.clone()).ok()?.timestamp();

                Some(AvailableSlot { starts_at, ends_at })
            })
            .collect())
    }
}

/// The instants bounding the shop-local calendar day, when representable.
fn day_bounds(date: Date, tz: &TimeZone) -> Option<(Timestamp, Timestamp)> {
    let start = date.to_zoned(tz.clone()).ok()?.timestamp();
    let end = date.tomorrow().ok()?.to_zoned(tz.clone()).ok()?.timestamp();

    Some((start, end))
}

#[automock]
#[async_trait]
/// Bookable-slot queries.
pub trait SchedulingService: Send + Sync {
    /// The start times still bookable for one barber, service and shop-local
    /// day, computed against `now`. Degenerate situations (day off, service
    /// longer than the window) come back as an empty list, never an error.
    async fn available_slots(
        &self,
        shop: ShopUuid,
        barber: BarberUuid,
        service: ServiceUuid,
        date: Date,
        now: Timestamp,
    ) -> Result<Vec<AvailableSlot>, SchedulingServiceError>;
}

#[cfg(test)]
mod tests {
    use chairtime::schedule::{WeeklyAvailability, WorkingHours};
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use crate::{
        domain::appointments::{
            AppointmentsService,
            models::{AppointmentUuid, NewAppointment},
        },
        test::TestContext,
    };

    use super::*;

    fn ts(text: &str) -> Timestamp {
        text.parse().expect("valid timestamp")
    }

    /// Mondays 09:00–17:00 shop-local.
    fn monday_hours() -> WeeklyAvailability {
        WeeklyAvailability {
            monday: Some(WorkingHours {
                open: time(9, 0, 0, 0),
                close: time(17, 0, 0, 0),
            }),
            ..WeeklyAvailability::default()
        }
    }

    #[tokio::test]
    async fn slots_respect_bookings_and_shop_timezone() -> TestResult {
        let ctx = TestContext::new().await;

        let customer = ctx.create_user("Ayesha", 0, 0).await;
        let barber = ctx.create_barber(monday_hours()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        // The default test shop runs on Asia/Karachi (UTC+5): Monday 10:00
        // local is 05:00 UTC.
        ctx.book(customer.uuid, barber.uuid, service.uuid, ts("2026-03-02T05:00:00Z"))
            .await;

        let slots = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                service.uuid,
                date(2026, 3, 2),
                ts("2026-03-01T15:00:00Z"),
            )
            .await?;

        let starts: Vec<Timestamp> = slots.iter().map(|slot| slot.starts_at).collect();

        // 31 aligned candidates minus 10:00 and 10:15 local.
        assert_eq!(slots.len(), 29);
        assert_eq!(starts.first(), Some(&ts("2026-03-02T04:00:00Z")));
        assert_eq!(starts.last(), Some(&ts("2026-03-02T11:30:00Z")));
        assert!(!starts.contains(&ts("2026-03-02T05:00:00Z")));
        assert!(!starts.contains(&ts("2026-03-02T05:15:00Z")));
        assert!(starts.contains(&ts("2026-03-02T05:30:00Z")));

        let first = slots.first().copied().expect("at least one slot");
        assert_eq!(first.ends_at, ts("2026-03-02T04:30:00Z"));

        Ok(())
    }

    #[tokio::test]
    async fn day_off_yields_no_slots() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(monday_hours()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        let slots = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                service.uuid,
                // 2026-03-03 is a Tuesday.
                date(2026, 3, 3),
                ts("2026-03-01T15:00:00Z"),
            )
            .await?;

        assert!(slots.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn now_mid_window_hides_elapsed_slots() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(monday_hours()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        // Monday 12:05 local is 07:05 UTC.
        let slots = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                service.uuid,
                date(2026, 3, 2),
                ts("2026-03-02T07:05:00Z"),
            )
            .await?;

        let starts: Vec<Timestamp> = slots.iter().map(|slot| slot.starts_at).collect();

        assert_eq!(starts.first(), Some(&ts("2026-03-02T07:15:00Z")));

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_mask_slots() -> TestResult {
        let ctx = TestContext::new().await;

        let customer = ctx.create_user("Ayesha", 0, 0).await;
        let barber = ctx.create_barber(monday_hours()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        let appointment = ctx
            .book(customer.uuid, barber.uuid, service.uuid, ts("2026-03-02T05:00:00Z"))
            .await;

        ctx.appointments
            .update_status(
                ctx.shop,
                appointment.uuid,
                chairtime::appointments::AppointmentStatus::Cancelled,
            )
            .await?;

        let slots = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                service.uuid,
                date(2026, 3, 2),
                ts("2026-03-01T15:00:00Z"),
            )
            .await?;

        let starts: Vec<Timestamp> = slots.iter().map(|slot| slot.starts_at).collect();

        assert_eq!(slots.len(), 31);
        assert!(starts.contains(&ts("2026-03-02T05:00:00Z")));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_service_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let barber = ctx.create_barber(monday_hours()).await;

        let result = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                ServiceUuid::new(),
                date(2026, 3, 2),
                ts("2026-03-01T15:00:00Z"),
            )
            .await;

        assert!(
            matches!(result, Err(SchedulingServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn proposed_slot_can_be_lost_to_a_faster_booking() -> TestResult {
        let ctx = TestContext::new().await;

        let customer = ctx.create_user("Ayesha", 0, 0).await;
        let rival = ctx.create_user("Bilal", 0, 0).await;
        let barber = ctx.create_barber(monday_hours()).await;
        let service = ctx.create_service(barber.uuid, "Haircut", 1500, 30).await;

        let slots = ctx
            .scheduling
            .available_slots(
                ctx.shop,
                barber.uuid,
                service.uuid,
                date(2026, 3, 2),
                ts("2026-03-01T15:00:00Z"),
            )
            .await?;

        let proposed = slots.first().copied().expect("at least one slot");

        // The rival books the proposed interval first; the original
        // customer's attempt fails at booking time, not at proposal time.
        ctx.book(rival.uuid, barber.uuid, service.uuid, proposed.starts_at)
            .await;

        let result = ctx
            .appointments
            .book_appointment(
                ctx.shop,
                NewAppointment {
                    uuid: AppointmentUuid::new(),
                    customer_uuid: customer.uuid,
                    barber_uuid: barber.uuid,
                    service_uuid: service.uuid,
                    starts_at: proposed.starts_at,
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(crate::domain::appointments::AppointmentsServiceError::SlotTaken)
            ),
            "expected SlotTaken, got {result:?}"
        );

        Ok(())
    }
}
