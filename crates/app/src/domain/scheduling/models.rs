//! Scheduling Models

use jiff::Timestamp;
use serde::Serialize;

/// A bookable start time offered to the customer. The interval is
/// re-validated when the customer actually books it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}
