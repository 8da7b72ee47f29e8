//! End-to-end transform of a realistic clinic listing page: envelope ->
//! typed records -> facility + channels + offerings + hours + availability.

use chrono::{DateTime, TimeZone, Utc};

use caremap_ingest::cortico;
use caremap_ingest::validate_facility;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

const PAGE_BODY: &str = r#"{
  "results": [
    {
      "clinic_name": "Harbourview Walk-In Clinic",
      "clinic_slug": "harbourview-walk-in",
      "phone_number": "250 555 0100",
      "booking_url": "https://book.example.com/harbourview",
      "clinic_address": "200 Wharf St",
      "clinic_city": "Victoria",
      "clinic_province": "BC",
      "clinic_country": "Canada",
      "point": {"type": "Point", "coordinates": [-123.37, 48.42]},
      "accepts_new_patients": true,
      "is_bookable_online": true,
      "has_telehealth": true,
      "workflows": [
        {"slug": "walk-in", "display_name": "Walk-In Visit", "workflow_type": "terminal-walk-in", "has_clinic": true, "allow_new_patients": true},
        {"slug": "mental-health", "display_name": "Counselling", "workflow_type": "appointment", "has_video": true}
      ],
      "operating_hours": {
        "Monday": "9am-5pm",
        "Tuesday": "9:00 to 12:00 and 1pm-5pm",
        "Wednesday": "Closed",
        "Thursday": "24/7",
        "Friday": "17:00-09:00",
        "Someday": "9am-5pm"
      },
      "availability": {
        "walk-in": {"available_at": "2025-06-02T09:00:00Z"},
        "counselling": "2025-06-01T13:30:00Z",
        "stale": "2025-05-01T09:00:00Z"
      }
    },
    {
      "clinic_name": ""
    }
  ],
  "next": "https://api.example.com/clinics/?page=2"
}"#;

#[test]
fn full_page_transform() {
    let page = cortico::parse_page(PAGE_BODY).expect("page should decode");
    assert_eq!(page.next.as_deref(), Some("https://api.example.com/clinics/?page=2"));

    let records: Vec<_> = page.results.iter().filter_map(cortico::parse_record).collect();
    assert_eq!(records.len(), 2);

    // First record survives validation, second is missing its identity.
    let facility = cortico::transform_facility(&records[0], now());
    assert!(validate_facility(&facility).is_empty());
    assert_eq!(facility.slug, "harbourview-walk-in");
    assert_eq!(facility.phone.as_deref(), Some("(250) 555-0100"));

    let invalid = cortico::transform_facility(&records[1], now());
    assert!(!validate_facility(&invalid).is_empty());

    let channels = cortico::transform_booking_channels("fac-1", &records[0], now());
    assert_eq!(channels.len(), 2);

    let offerings = cortico::transform_service_offerings("fac-1", &records[0].workflows);
    assert_eq!(offerings.len(), 2);
    assert_eq!(offerings[0].service_slug, "walk-in");
    assert_eq!(offerings[1].service_slug, "mental-health");

    let hours = cortico::transform_operating_hours("fac-1", &records[0]);
    // Monday 1 slot, Tuesday 2 slots, Thursday all-day; Wednesday closed,
    // Friday inverted, "Someday" unmapped.
    assert_eq!(hours.len(), 4);
    assert_eq!(hours[0].weekday, 0);
    assert_eq!((hours[1].open_time.as_str(), hours[1].close_time.as_str()), ("09:00", "12:00"));
    assert_eq!((hours[2].open_time.as_str(), hours[2].close_time.as_str()), ("13:00", "17:00"));
    assert_eq!(hours[2].slot, 2);
    assert_eq!((hours[3].open_time.as_str(), hours[3].close_time.as_str()), ("00:00", "23:59"));

    let nearest = cortico::transform_availability("fac-1", &records[0], now()).expect("future slot");
    assert_eq!(nearest.available_at, "2025-06-01T13:30:00Z");
    assert_eq!(nearest.source, "cortico");
    assert_eq!(nearest.observed_at, now());
}
