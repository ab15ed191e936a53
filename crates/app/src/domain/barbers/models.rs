//! Barber Models

use chairtime::schedule::WeeklyAvailability;
use jiff::Timestamp;

use crate::{domain::users::models::UserUuid, ids::Id};

/// Barber UUID
pub type BarberUuid = Id<Barber>;

/// A chair in a shop: the person customers book appointments with.
#[derive(Debug, Clone)]
pub struct Barber {
    pub uuid: BarberUuid,
    pub display_name: String,

    /// Payee account for this barber's earnings, when tracked. Payments to
    /// an unlinked barber record only the payer's side of the ledger.
    pub user_uuid: Option<UserUuid>,

    /// Recurring weekly working hours, in the shop's timezone.
    pub availability: WeeklyAvailability,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Barber Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewBarber {
    pub uuid: BarberUuid,
    pub display_name: String,
    pub user_uuid: Option<UserUuid>,
    pub availability: WeeklyAvailability,
}
