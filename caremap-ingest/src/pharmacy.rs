//! Pharmacy API source: flat records, simpler than clinics.
//!
//! Pharmacies share the clinic listing's page envelope and operating-hours
//! text format, but carry coordinates inline and never offer telehealth or
//! direct patient intake.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use caremap_core::{HourInterval, normalize_hours};

use crate::types::{BookingChannel, ChannelType, Facility};
use crate::util::{clean_phone, generate_slug};

/// A raw pharmacy record as served by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PharmacyRecord {
    pub name: String,
    pub slug: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: String,
    pub city: String,
    pub province: String,
    pub country: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub is_delivery_pharmacy: bool,
    pub operating_hours: Option<Value>,
}

/// Decode one listing entry, skipping records that don't fit the shape.
pub fn parse_record(value: &Value) -> Option<PharmacyRecord> {
    match serde_json::from_value(value.clone()) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(%err, "skipping undecodable pharmacy record");
            None
        }
    }
}

/// Transform a pharmacy record into the common facility schema.
///
/// Pharmacies don't take on patients or run telehealth; "bookable online"
/// just means they have a website.
pub fn transform_facility(record: &PharmacyRecord, now: DateTime<Utc>) -> Facility {
    let name = record.name.trim().to_string();
    let slug = record
        .slug
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| generate_slug(&name, "pharmacy", now));

    Facility {
        name,
        slug,
        facility_type: "pharmacy".to_string(),
        website: record.website.clone(),
        email: record.email.clone(),
        phone: clean_phone(record.phone_number.as_deref()),
        address_line1: record.address.clone(),
        city: record.city.clone(),
        province: record.province.clone(),
        country: record
            .country
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Canada".to_string()),
        longitude: record.longitude,
        latitude: record.latitude,
        accepts_new_patients: false,
        is_bookable_online: record.website.is_some(),
        has_telehealth: false,
        status: "active".to_string(),
    }
}

/// Contact channels: website, phone, and email, whichever are present.
pub fn transform_booking_channels(
    facility_id: &str,
    record: &PharmacyRecord,
    now: DateTime<Utc>,
) -> Vec<BookingChannel> {
    let mut channels = Vec::new();

    if let Some(url) = record.website.clone().filter(|u| !u.is_empty()) {
        channels.push(BookingChannel {
            facility_id: facility_id.to_string(),
            channel_type: ChannelType::Web,
            label: "Pharmacy Website".to_string(),
            url: Some(url),
            phone: None,
            email: None,
            external_provider: Some(crate::cortico::SOURCE.to_string()),
            is_active: true,
            last_checked_at: now,
        });
    }

    if record.phone_number.as_deref().is_some_and(|p| !p.is_empty()) {
        channels.push(BookingChannel {
            facility_id: facility_id.to_string(),
            channel_type: ChannelType::Phone,
            label: "Phone Contact".to_string(),
            url: None,
            phone: clean_phone(record.phone_number.as_deref()),
            email: None,
            external_provider: None,
            is_active: true,
            last_checked_at: now,
        });
    }

    if let Some(email) = record.email.clone().filter(|e| !e.is_empty()) {
        channels.push(BookingChannel {
            facility_id: facility_id.to_string(),
            channel_type: ChannelType::Email,
            label: "Email Contact".to_string(),
            url: None,
            phone: None,
            email: Some(email),
            external_provider: None,
            is_active: true,
            last_checked_at: now,
        });
    }

    channels
}

/// Operating hours use the same free-form text format as clinics.
pub fn transform_operating_hours(facility_id: &str, record: &PharmacyRecord) -> Vec<HourInterval> {
    normalize_hours(facility_id, record.operating_hours.as_ref())
}
