//! Chairtime
//!
//! Pure booking-domain engine for barbershop scheduling: weekly working
//! hours, bookable-slot computation, the appointment lifecycle table and the
//! wallet vocabulary shared with the persistence layer.
//!
//! Everything in this crate is deterministic and side-effect free. The
//! current time is always an explicit parameter, never read from the clock,
//! so callers and tests control it.

pub mod appointments;
pub mod schedule;
pub mod wallet;
