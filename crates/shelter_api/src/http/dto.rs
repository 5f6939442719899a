use crate::domain::AnimalFields;
use chrono::{DateTime, NaiveDate, Utc};
use common::domain::{
    AdoptionStatus, AgeCategory, Animal, AnimalPhoto, Behavior, Gender, MedicalRecord,
    MedicalRecordType, SterilizationStatus, Species, Vaccination, VaccinationStatus, VaccineName,
};
use serde::{Deserialize, Serialize};

/// Back-office representation of an animal; choice fields carry storage codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimalDto {
    pub id: i64,
    pub chip_id: String,
    pub name: String,
    pub species: Species,
    pub gender: Gender,
    pub age_numeric: Option<i32>,
    pub age_category: Option<AgeCategory>,
    pub injured: bool,
    pub behavior: Behavior,
    pub vaccination_status: VaccinationStatus,
    pub sterilization_status: SterilizationStatus,
    pub cage_number: i32,
    pub entry_date: DateTime<Utc>,
    pub capture_location: String,
    pub capture_date: NaiveDate,
    pub finder_contact: String,
    pub public_visibility: bool,
    pub adoption_status: AdoptionStatus,
    pub shelter: Option<String>,
    pub identity_image_url: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnimalDto {
    pub fn new(animal: Animal, identity_image_url: Option<String>) -> Self {
        Self {
            id: animal.id,
            chip_id: animal.chip_id,
            name: animal.name,
            species: animal.species,
            gender: animal.gender,
            age_numeric: animal.age_numeric,
            age_category: animal.age_category,
            injured: animal.injured,
            behavior: animal.behavior,
            vaccination_status: animal.vaccination_status,
            sterilization_status: animal.sterilization_status,
            cage_number: animal.cage_number,
            entry_date: animal.entry_date,
            capture_location: animal.capture_location,
            capture_date: animal.capture_date,
            finder_contact: animal.finder_contact,
            public_visibility: animal.public_visibility,
            adoption_status: animal.adoption_status,
            shelter: animal.shelter,
            identity_image_url,
            created_by: animal.created_by,
            created_at: animal.created_at,
            updated_at: animal.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoDto {
    pub id: i64,
    pub animal_id: i64,
    pub url: String,
    pub is_primary: bool,
    pub caption: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Option<String>,
}

impl PhotoDto {
    pub fn new(photo: AnimalPhoto, url: String) -> Self {
        Self {
            id: photo.id,
            animal_id: photo.animal_id,
            url,
            is_primary: photo.is_primary,
            caption: photo.caption,
            uploaded_at: photo.uploaded_at,
            uploaded_by: photo.uploaded_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicalRecordDto {
    pub id: i64,
    pub animal_id: i64,
    pub record_type: MedicalRecordType,
    pub record_type_label: &'static str,
    pub description: String,
    pub date_recorded: NaiveDate,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MedicalRecord> for MedicalRecordDto {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            animal_id: record.animal_id,
            record_type: record.record_type,
            record_type_label: record.record_type.label(),
            description: record.description,
            date_recorded: record.date_recorded,
            created_by: record.created_by,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaccinationDto {
    pub id: i64,
    pub animal_id: i64,
    pub vaccine_name: VaccineName,
    pub display_name: String,
    pub other_vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub date_administered: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub administered_by: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Vaccination> for VaccinationDto {
    fn from(vaccination: Vaccination) -> Self {
        Self {
            display_name: vaccination.display_name().to_string(),
            id: vaccination.id,
            animal_id: vaccination.animal_id,
            vaccine_name: vaccination.vaccine_name,
            other_vaccine_name: vaccination.other_vaccine_name,
            batch_number: vaccination.batch_number,
            date_administered: vaccination.date_administered,
            next_due_date: vaccination.next_due_date,
            administered_by: vaccination.administered_by,
            created_by: vaccination.created_by,
            created_at: vaccination.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanBody {
    #[serde(default)]
    pub qr_data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub chip_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnimalBody {
    pub chip_id: String,
    #[serde(flatten)]
    pub fields: AnimalFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegenerateIdentityBody {
    pub animal_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityBody {
    pub animal_ids: Vec<i64>,
    pub public_visibility: bool,
}

/// Photo upload; the image travels base64-encoded
#[derive(Debug, Clone, Deserialize)]
pub struct AddPhotoBody {
    pub content_base64: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub is_primary: bool,
}
