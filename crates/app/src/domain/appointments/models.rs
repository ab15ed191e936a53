//! Appointment Models

use chairtime::appointments::{AppointmentStatus, PaymentStatus};
use jiff::Timestamp;

use crate::{
    domain::{barbers::models::BarberUuid, catalog::models::ServiceUuid, users::models::UserUuid},
    ids::Id,
};

/// Appointment UUID
pub type AppointmentUuid = Id<Appointment>;

/// A booked visit. Price, duration and service name are snapshotted from
/// the catalog at booking time; once Completed and Paid the record is
/// immutable apart from the rating fields.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub uuid: AppointmentUuid,
    pub customer_uuid: UserUuid,
    pub barber_uuid: BarberUuid,

    /// Catalog service name at the time of booking.
    pub service_name: String,

    /// Agreed price in whole PKR units.
    pub price: u64,

    pub duration_minutes: i64,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,

    /// Amount settled against the bill; set exactly once, by the wallet
    /// service, when the appointment is paid.
    pub amount_paid: Option<u64>,

    /// 1–5 stars, settable once the appointment is Completed.
    pub rating: Option<i16>,

    pub review: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Appointment Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub uuid: AppointmentUuid,
    pub customer_uuid: UserUuid,
    pub barber_uuid: BarberUuid,

    /// Catalog service being booked; its price and duration are copied onto
    /// the appointment inside the booking transaction.
    pub service_uuid: ServiceUuid,

    pub starts_at: Timestamp,
}

/// An occupied stretch of a barber's day, as consumed by the slot
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedWindow {
    pub starts_at: Timestamp,
    pub duration_minutes: i64,
}
