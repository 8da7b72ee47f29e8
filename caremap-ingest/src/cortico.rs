//! Clinic/lab API source: typed records and transforms into the common
//! facility schema.
//!
//! The upstream API serves paginated JSON envelopes of clinic records. The
//! fetch/pagination loop lives elsewhere; this module owns everything from
//! "a page body string" down to normalized facility, channel, offering,
//! hours, and availability payloads.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use caremap_core::{HourInterval, NearestAvailability, normalize_hours, pick_nearest};

use crate::types::{BookingChannel, ChannelType, Facility, ServiceOffering};
use crate::util::{clean_phone, generate_slug};

/// Source tag stamped onto records derived from this API.
pub const SOURCE: &str = "cortico";

/// Fixed workflow-slug to service-slug table.
pub const WORKFLOW_SERVICES: &[(&str, &str)] = &[
    ("family-doctor", "family-medicine"),
    ("rapid-access-telehealth", "walk-in"),
    ("flu-shot", "flu-shot"),
    ("covid-vaccination", "flu-shot"),
    ("terminal", "walk-in"),
    ("walk-in", "walk-in"),
    ("urgent-care", "walk-in"),
    ("mental-health", "mental-health"),
    ("physiotherapy", "physiotherapy"),
    ("dental", "dental-cleaning"),
    ("vision", "eye-exam"),
    ("pharmacy", "prescription-refill"),
];

pub fn service_for_workflow(slug: &str) -> Option<&'static str> {
    WORKFLOW_SERVICES
        .iter()
        .find(|(workflow, _)| *workflow == slug)
        .map(|(_, service)| *service)
}

/// One page of the clinic listing endpoint.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next: Option<String>,
}

/// GeoJSON-style point; coordinates are `[longitude, latitude]` and either
/// may be null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    pub coordinates: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Workflow {
    pub slug: String,
    pub display_name: String,
    pub workflow_type: String,
    pub has_clinic: bool,
    pub has_phone: bool,
    pub has_video: bool,
    pub has_home_visit: bool,
    pub allow_new_patients: bool,
    pub scope_description: String,
}

/// A raw clinic record as served by the API. Every field is optional
/// upstream, so everything defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClinicRecord {
    pub clinic_name: String,
    pub clinic_slug: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub booking_url: Option<String>,
    pub clinic_address: String,
    pub clinic_city: String,
    pub clinic_province: String,
    pub clinic_country: Option<String>,
    pub point: Option<GeoPoint>,
    pub accepts_new_patients: bool,
    pub is_bookable_online: bool,
    pub has_telehealth: bool,
    pub specialties: Vec<String>,
    pub workflows: Vec<Workflow>,
    pub operating_hours: Option<Value>,
    pub availability: Option<Value>,
}

/// Decode a fetched page body into the listing envelope.
pub fn parse_page(body: &str) -> Result<Page> {
    serde_json::from_str(body).context("decoding clinic listing page")
}

/// Decode one listing entry; records that don't fit the shape are skipped
/// with a warning rather than failing the page.
pub fn parse_record(value: &Value) -> Option<ClinicRecord> {
    match serde_json::from_value(value.clone()) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(%err, "skipping undecodable clinic record");
            None
        }
    }
}

/// Transform a clinic record into the common facility schema.
pub fn transform_facility(record: &ClinicRecord, now: DateTime<Utc>) -> Facility {
    let name = record.clinic_name.trim().to_string();
    let slug = record
        .clinic_slug
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| generate_slug(&name, "facility", now));

    let (longitude, latitude) = match &record.point {
        Some(point) => (
            point.coordinates.first().copied().flatten(),
            point.coordinates.get(1).copied().flatten(),
        ),
        None => (None, None),
    };

    Facility {
        name,
        slug,
        facility_type: "clinic".to_string(),
        website: record.website.clone(),
        email: record.email.clone(),
        phone: clean_phone(record.phone_number.as_deref()),
        address_line1: record.clinic_address.clone(),
        city: record.clinic_city.clone(),
        province: record.clinic_province.clone(),
        country: record
            .clinic_country
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Canada".to_string()),
        longitude,
        latitude,
        accepts_new_patients: record.accepts_new_patients,
        is_bookable_online: record.is_bookable_online,
        has_telehealth: record.has_telehealth,
        status: "active".to_string(),
    }
}

/// Booking channels: the online booking link and the phone line, when known.
pub fn transform_booking_channels(
    facility_id: &str,
    record: &ClinicRecord,
    now: DateTime<Utc>,
) -> Vec<BookingChannel> {
    let mut channels = Vec::new();

    if let Some(url) = record.booking_url.clone().filter(|u| !u.is_empty()) {
        channels.push(BookingChannel {
            facility_id: facility_id.to_string(),
            channel_type: ChannelType::Web,
            label: "Online Booking".to_string(),
            url: Some(url),
            phone: None,
            email: None,
            external_provider: Some(SOURCE.to_string()),
            is_active: true,
            last_checked_at: now,
        });
    }

    if record.phone_number.as_deref().is_some_and(|p| !p.is_empty()) {
        channels.push(BookingChannel {
            facility_id: facility_id.to_string(),
            channel_type: ChannelType::Phone,
            label: "Phone Booking".to_string(),
            url: None,
            phone: clean_phone(record.phone_number.as_deref()),
            email: None,
            external_provider: None,
            is_active: true,
            last_checked_at: now,
        });
    }

    channels
}

/// One service offering per workflow. The service slug comes from the fixed
/// workflow table, falling back to the workflow's display name for slugs the
/// table doesn't know; offerings with no resolvable slug are skipped.
pub fn transform_service_offerings(
    facility_id: &str,
    workflows: &[Workflow],
) -> Vec<ServiceOffering> {
    let mut offerings = Vec::new();

    for workflow in workflows {
        let service_slug = service_for_workflow(&workflow.slug)
            .map(str::to_string)
            .unwrap_or_else(|| workflow.display_name.clone());
        if service_slug.is_empty() {
            continue;
        }

        offerings.push(ServiceOffering {
            facility_id: facility_id.to_string(),
            service_slug,
            display_name: workflow.display_name.clone(),
            workflow_type: workflow.workflow_type.clone(),
            has_in_person: workflow.has_clinic,
            has_phone: workflow.has_phone,
            has_video: workflow.has_video,
            has_home_visit: workflow.has_home_visit,
            allow_new_patients: workflow.allow_new_patients,
            scope_description: workflow.scope_description.clone(),
        });
    }

    offerings
}

/// Operating hours, via the schedule text normalizer.
pub fn transform_operating_hours(facility_id: &str, record: &ClinicRecord) -> Vec<HourInterval> {
    normalize_hours(facility_id, record.operating_hours.as_ref())
}

/// Nearest future availability, tagged with this source.
pub fn transform_availability(
    facility_id: &str,
    record: &ClinicRecord,
    now: DateTime<Utc>,
) -> Option<NearestAvailability> {
    pick_nearest(facility_id, record.availability.as_ref(), SOURCE, now)
}
