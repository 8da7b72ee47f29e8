//! Common facility schema shared by every source transformer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized facility record, ready for upsert by natural key (slug).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub name: String,
    pub slug: String,
    pub facility_type: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub accepts_new_patients: bool,
    pub is_bookable_online: bool,
    pub has_telehealth: bool,
    pub status: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Web,
    Phone,
    Email,
}

/// One way to reach or book a facility. Only the field matching
/// `channel_type` is populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingChannel {
    pub facility_id: String,
    pub channel_type: ChannelType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_provider: Option<String>,
    pub is_active: bool,
    pub last_checked_at: DateTime<Utc>,
}

/// A service a facility offers, keyed by service slug until the persistence
/// layer resolves it to a service id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceOffering {
    pub facility_id: String,
    pub service_slug: String,
    pub display_name: String,
    pub workflow_type: String,
    pub has_in_person: bool,
    pub has_phone: bool,
    pub has_video: bool,
    pub has_home_visit: bool,
    pub allow_new_patients: bool,
    pub scope_description: String,
}
