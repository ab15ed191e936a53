//! Bookable Slot Computation
//!
//! Derives the candidate start times a customer can still book for one
//! barber on one day, from the barber's working hours, the requested service
//! length and the appointments already on the books.

use jiff::{
    Span,
    civil::{Date, DateTime},
};

use crate::schedule::WeeklyAvailability;

/// Default spacing between candidate slot start times, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: i64 = 15;

/// Upper bound for service and granularity lengths. Anything past a full day
/// is treated as degenerate input.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// An appointment interval already booked for a barber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    /// Appointment start, in shop-local civil time.
    pub start: DateTime,

    /// Appointment length in minutes.
    pub minutes: i64,
}

/// A bookable candidate start time. Ephemeral: computed on demand, never
/// persisted, and only meaningful relative to the `now` it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Slot start, in shop-local civil time.
    pub start: DateTime,

    /// Service length the slot was computed for, in minutes.
    pub minutes: i64,
}

impl Slot {
    /// Civil end of the slot (`start + minutes`), when representable.
    #[must_use]
    pub fn end(&self) -> Option<DateTime> {
        add_minutes(self.start, self.minutes)
    }
}

/// Compute the ordered bookable start times for one barber and one day.
///
/// Candidates run from the day's opening time in `granularity_minutes`
/// steps. A candidate is kept when the whole service fits before closing
/// time, it starts strictly after `now`, and its half-open interval does not
/// intersect any booked interval. Granularity is deliberately independent of
/// service length so short services can pack between longer ones.
///
/// Degenerate input (a day off, `close <= open`, a non-positive or
/// longer-than-a-day service or granularity) yields an empty list rather
/// than an error: "no slots available" is always a valid answer.
#[must_use]
pub fn available_slots(
    availability: &WeeklyAvailability,
    date: Date,
    service_minutes: i64,
    booked: &[BookedInterval],
    now: DateTime,
    granularity_minutes: i64,
) -> Vec<Slot> {
    if !(1..=MINUTES_PER_DAY).contains(&service_minutes)
        || !(1..=MINUTES_PER_DAY).contains(&granularity_minutes)
    {
        return Vec::new();
    }

    let Some(hours) = availability.for_weekday(date.weekday()) else {
        return Vec::new();
    };

    if hours.close <= hours.open {
        return Vec::new();
    }

    let day_end = date.to_datetime(hours.close);

    // Intervals with a resolved end. An unrepresentable or non-positive
    // interval cannot mask anything, so it is dropped instead of blocking.
    let busy: Vec<(DateTime, DateTime)> = booked
        .iter()
        .filter(|interval| interval.minutes > 0)
        .filter_map(|interval| {
            add_minutes(interval.start, interval.minutes).map(|end| (interval.start, end))
        })
        .collect();

    let mut slots = Vec::new();
    let mut candidate = date.to_datetime(hours.open);

    loop {
        let Some(slot_end) = add_minutes(candidate, service_minutes) else {
            break;
        };

        // Candidates only move forward, so the first one that cannot finish
        // by closing time ends the walk.
        if slot_end > day_end {
            break;
        }

        let in_future = candidate > now;
        let clashes = busy
            .iter()
            .any(|&(start, end)| candidate < end && slot_end > start);

        if in_future && !clashes {
            slots.push(Slot {
                start: candidate,
                minutes: service_minutes,
            });
        }

        match add_minutes(candidate, granularity_minutes) {
            Some(next) => candidate = next,
            None => break,
        }
    }

    slots
}

fn add_minutes(datetime: DateTime, minutes: i64) -> Option<DateTime> {
    let span = Span::new().try_minutes(minutes).ok()?;

    datetime.checked_add(span).ok()
}
