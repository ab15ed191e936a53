//! Shop Models

use jiff::Timestamp;

use crate::ids::Id;

/// Shop UUID
pub type ShopUuid = Id<Shop>;

/// A barbershop tenant. Every other record in the system is scoped to
/// exactly one shop.
#[derive(Debug, Clone)]
pub struct Shop {
    pub uuid: ShopUuid,

    /// Human-readable shop name.
    pub name: String,

    /// IANA timezone identifier the shop's calendar lives in. Validated at
    /// creation; availability and slot computation are civil in this zone.
    pub timezone: String,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Shop Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewShop {
    pub uuid: ShopUuid,
    pub name: String,
    pub timezone: String,
}
