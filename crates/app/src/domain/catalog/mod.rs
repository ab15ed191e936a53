//! Catalog
//!
//! The services each barber offers: name, price and duration. Appointments
//! snapshot these fields at booking time, so later edits never rewrite
//! history.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
