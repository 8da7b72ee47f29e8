//! Pre-persistence validation for transformed facilities.

use crate::types::Facility;

/// Check a facility before upsert. Returns every violation found; an empty
/// vec means the record is good to persist. Callers log and skip invalid
/// records rather than aborting a crawl.
pub fn validate_facility(facility: &Facility) -> Vec<String> {
    let mut errors = Vec::new();

    if facility.name.is_empty() {
        errors.push("facility name is required".to_string());
    }
    if facility.slug.is_empty() {
        errors.push("facility slug is required".to_string());
    }
    if facility.facility_type.is_empty() {
        errors.push("facility type is required".to_string());
    }

    if let Some(longitude) = facility.longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            errors.push("longitude must be between -180 and 180".to_string());
        }
    }
    if let Some(latitude) = facility.latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            errors.push("latitude must be between -90 and 90".to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_facility() -> Facility {
        Facility {
            name: "Maple Medical Clinic".to_string(),
            slug: "maple-medical-clinic".to_string(),
            facility_type: "clinic".to_string(),
            website: None,
            email: None,
            phone: None,
            address_line1: "123 Main St".to_string(),
            city: "Vancouver".to_string(),
            province: "BC".to_string(),
            country: "Canada".to_string(),
            longitude: Some(-123.1),
            latitude: Some(49.3),
            accepts_new_patients: true,
            is_bookable_online: false,
            has_telehealth: false,
            status: "active".to_string(),
        }
    }

    #[test]
    fn valid_facility_has_no_errors() {
        assert!(validate_facility(&valid_facility()).is_empty());
    }

    #[test]
    fn missing_identity_fields_each_reported() {
        let mut f = valid_facility();
        f.name.clear();
        f.slug.clear();
        f.facility_type.clear();
        let errors = validate_facility(&f);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let mut f = valid_facility();
        f.longitude = Some(-200.0);
        f.latitude = Some(95.0);
        let errors = validate_facility(&f);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("longitude"));
    }

    #[test]
    fn absent_coordinates_are_fine() {
        let mut f = valid_facility();
        f.longitude = None;
        f.latitude = None;
        assert!(validate_facility(&f).is_empty());
    }
}
