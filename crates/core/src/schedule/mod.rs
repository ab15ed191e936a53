//! Weekly Working Hours
//!
//! A barber's recurring schedule: one optional open/close window per
//! weekday. The document round-trips through serde so the persistence layer
//! can store it as a single `jsonb` column.

mod slots;

pub use slots::{BookedInterval, DEFAULT_GRANULARITY_MINUTES, Slot, available_slots};

use jiff::civil::{Time, Weekday};
use serde::{Deserialize, Serialize};

/// Opening and closing times for a single working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Time the barber starts taking appointments.
    pub open: Time,

    /// Time the barber stops working. Appointments must end at or before
    /// this; a `close` at or before `open` makes the day unbookable.
    pub close: Time,
}

/// Per-weekday working hours. A missing day is a day off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyAvailability {
    /// Monday working hours.
    pub monday: Option<WorkingHours>,

    /// Tuesday working hours.
    pub tuesday: Option<WorkingHours>,

    /// Wednesday working hours.
    pub wednesday: Option<WorkingHours>,

    /// Thursday working hours.
    pub thursday: Option<WorkingHours>,

    /// Friday working hours.
    pub friday: Option<WorkingHours>,

    /// Saturday working hours.
    pub saturday: Option<WorkingHours>,

    /// Sunday working hours.
    pub sunday: Option<WorkingHours>,
}

impl WeeklyAvailability {
    /// Working hours for the given weekday, if the barber works that day.
    #[must_use]
    pub const fn for_weekday(&self, weekday: Weekday) -> Option<WorkingHours> {
        match weekday {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
            Weekday::Saturday => self.saturday,
            Weekday::Sunday => self.sunday,
        }
    }

    /// True when no day of the week has working hours.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.monday.is_none()
            && self.tuesday.is_none()
            && self.wednesday.is_none()
            && self.thursday.is_none()
            && self.friday.is_none()
            && self.saturday.is_none()
            && self.sunday.is_none()
    }
}
