//! caremap-ingest: source-record transforms into the common facility schema.
//!
//! Each source module owns its raw record shape and the pure transforms that
//! produce facility, booking-channel, service-offering, hours, and
//! availability payloads for the persistence layer. Network fetching and
//! storage live outside this crate.

pub mod cortico;
pub mod pharmacy;
pub mod types;
pub mod util;
pub mod validate;

pub use types::{BookingChannel, ChannelType, Facility, ServiceOffering};
pub use validate::validate_facility;
