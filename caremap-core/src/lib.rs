//! caremap-core: schedule-text and availability normalization for facility ingest.

pub mod availability;
pub mod hours;

pub use availability::{NearestAvailability, pick_nearest};
pub use hours::{HourInterval, normalize_hours};
