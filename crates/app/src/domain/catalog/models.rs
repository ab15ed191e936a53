//! Catalog Models

use jiff::Timestamp;

use crate::{domain::barbers::models::BarberUuid, ids::Id};

/// Service UUID
pub type ServiceUuid = Id<Service>;

/// One bookable service a barber offers.
#[derive(Debug, Clone)]
pub struct Service {
    pub uuid: ServiceUuid,
    pub barber_uuid: BarberUuid,
    pub name: String,

    /// Price in whole PKR units.
    pub price: u64,

    /// Appointment length; also the interval the slot computation blocks
    /// out on the barber's day.
    pub duration_minutes: i64,

    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Service Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub uuid: ServiceUuid,
    pub barber_uuid: BarberUuid,
    pub name: String,
    pub price: u64,
    pub duration_minutes: i64,
    pub description: Option<String>,
}

/// Full replacement for an existing service's editable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUpdate {
    pub name: String,
    pub price: u64,
    pub duration_minutes: i64,
    pub description: Option<String>,
}
