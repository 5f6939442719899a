//! Fixtures shared by unit tests across the workspace.

use crate::domain::{
    AdoptionStatus, Animal, AnimalPhoto, Behavior, Gender, SterilizationStatus, Species,
    VaccinationStatus,
};
use chrono::{NaiveDate, TimeZone, Utc};

/// A private, adult dog with a fixed entry date and no identity image
pub fn sample_animal(id: i64, chip_id: &str) -> Animal {
    let entered = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    Animal {
        id,
        chip_id: chip_id.to_string(),
        name: "Rex".to_string(),
        species: Species::Dog,
        gender: Gender::Male,
        age_numeric: Some(3),
        age_category: None,
        injured: false,
        behavior: Behavior::Calm,
        vaccination_status: VaccinationStatus::Vaccine2,
        sterilization_status: SterilizationStatus::Yes,
        cage_number: 4,
        entry_date: entered,
        capture_location: "Harbour road".to_string(),
        capture_date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        finder_contact: String::new(),
        public_visibility: false,
        adoption_status: AdoptionStatus::Available,
        shelter: None,
        identity_image: None,
        created_by: Some("staff".to_string()),
        created_at: entered,
        updated_at: entered,
    }
}

pub fn sample_photo(id: i64, animal_id: i64, image: &str, is_primary: bool) -> AnimalPhoto {
    AnimalPhoto {
        id,
        animal_id,
        image: image.to_string(),
        is_primary,
        caption: String::new(),
        uploaded_at: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
        uploaded_by: None,
    }
}
