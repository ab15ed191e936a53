//! Scheduling
//!
//! Bookable-slot queries: gathers a shop's timezone, a barber's weekly
//! hours, a service's duration and the day's booked intervals, then runs
//! the pure slot computation over them.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::SchedulingServiceError;
pub use service::*;
