use crate::domain::result::{DomainError, DomainResult};
use crate::domain::{
    AdoptionStatus, AgeCategory, Behavior, Gender, SterilizationStatus, Species,
    VaccinationStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

/// Placeholder rendered when a record carries neither age form
pub const AGE_UNSPECIFIED_LABEL: &str = "Μη καθορισμένη";

/// Animal domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animal {
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
    /// Media key of the generated identity code image
    pub identity_image: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Animal {
    /// Numeric age wins over the category; neither yields `Unspecified`.
    pub fn age(&self) -> AgeDisplay {
        match (self.age_numeric, self.age_category) {
            (Some(years), _) => AgeDisplay::Years(years),
            (None, Some(category)) => AgeDisplay::Category(category),
            (None, None) => AgeDisplay::Unspecified,
        }
    }

    pub fn has_identity_image(&self) -> bool {
        self.identity_image
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}

/// Age as shown on lookup, listing and export surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeDisplay {
    Years(i32),
    Category(AgeCategory),
    Unspecified,
}

impl std::fmt::Display for AgeDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeDisplay::Years(years) => write!(f, "{}", years),
            AgeDisplay::Category(category) => f.write_str(category.label()),
            AgeDisplay::Unspecified => f.write_str(AGE_UNSPECIFIED_LABEL),
        }
    }
}

impl Serialize for AgeDisplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AgeDisplay::Years(years) => serializer.serialize_i32(*years),
            AgeDisplay::Category(category) => serializer.serialize_str(category.label()),
            AgeDisplay::Unspecified => serializer.serialize_str(AGE_UNSPECIFIED_LABEL),
        }
    }
}

/// Repository input for inserting an animal (id and timestamps assigned by storage)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAnimalRepoInput {
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
    pub capture_location: String,
    pub capture_date: NaiveDate,
    pub finder_contact: String,
    pub public_visibility: bool,
    pub adoption_status: AdoptionStatus,
    pub shelter: Option<String>,
    pub created_by: Option<String>,
}

/// Repository input for updating the mutable fields of an animal.
/// The chip id is fixed at creation and is not part of this input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAnimalRepoInput {
    pub animal_id: i64,
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
    pub capture_location: String,
    pub capture_date: NaiveDate,
    pub finder_contact: String,
    pub public_visibility: bool,
    pub adoption_status: AdoptionStatus,
    pub shelter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAnimalRepoInput {
    pub animal_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAnimalByChipRepoInput {
    pub chip_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAnimalRepoInput {
    pub animal_id: i64,
}

/// Column a listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimalOrderField {
    CreatedAt,
    Name,
    EntryDate,
}

impl AnimalOrderField {
    pub fn column(&self) -> &'static str {
        match self {
            AnimalOrderField::CreatedAt => "created_at",
            AnimalOrderField::Name => "name",
            AnimalOrderField::EntryDate => "entry_date",
        }
    }
}

/// Listing order, parsed from `name`, `-entry_date` and so on.
/// Defaults to newest record first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct AnimalOrdering {
    pub field: AnimalOrderField,
    pub descending: bool,
}

impl Default for AnimalOrdering {
    fn default() -> Self {
        Self {
            field: AnimalOrderField::CreatedAt,
            descending: true,
        }
    }
}

impl FromStr for AnimalOrdering {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "created_at" => AnimalOrderField::CreatedAt,
            "name" => AnimalOrderField::Name,
            "entry_date" => AnimalOrderField::EntryDate,
            other => {
                return Err(DomainError::ValidationError(format!(
                    "unknown ordering field: {}",
                    other
                )));
            }
        };
        Ok(Self { field, descending })
    }
}

impl TryFrom<String> for AnimalOrdering {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Listing filter; empty/None fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAnimalsRepoInput {
    pub species: Option<Species>,
    pub gender: Option<Gender>,
    pub behavior: Option<Behavior>,
    pub adoption_statuses: Vec<AdoptionStatus>,
    pub public_visibility: Option<bool>,
    /// Exact shelter name
    pub shelter: Option<String>,
    /// Case-insensitive substring over name, chip id, capture location and shelter
    pub search: Option<String>,
    pub ordering: AnimalOrdering,
}

/// Replaces only the identity image column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIdentityImageRepoInput {
    pub animal_id: i64,
    pub identity_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPublicVisibilityRepoInput {
    pub animal_ids: Vec<i64>,
    pub public_visibility: bool,
}

/// Aggregate counts shown on the back-office overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnimalStats {
    pub total: i64,
    pub dogs: i64,
    pub cats: i64,
    pub other_species: i64,
    pub males: i64,
    pub females: i64,
    pub sterilized: i64,
    pub not_sterilized: i64,
    pub sterilization_scheduled: i64,
    pub injured: i64,
    pub healthy: i64,
    pub available: i64,
    pub pending: i64,
    pub adopted: i64,
    pub not_for_adoption: i64,
    pub public: i64,
    pub private: i64,
}

/// Repository trait for animal storage operations.
/// Chip id uniqueness is enforced by the storage layer.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// Insert a new animal; fails with `AnimalAlreadyExists` on a duplicate chip id
    async fn create_animal(&self, input: CreateAnimalRepoInput) -> DomainResult<Animal>;

    async fn get_animal(&self, input: GetAnimalRepoInput) -> DomainResult<Option<Animal>>;

    /// Exact chip id match
    async fn get_animal_by_chip_id(
        &self,
        input: GetAnimalByChipRepoInput,
    ) -> DomainResult<Option<Animal>>;

    /// Newest first
    async fn list_animals(&self, input: ListAnimalsRepoInput) -> DomainResult<Vec<Animal>>;

    async fn update_animal(&self, input: UpdateAnimalRepoInput) -> DomainResult<Animal>;

    async fn update_identity_image(&self, input: UpdateIdentityImageRepoInput) -> DomainResult<()>;

    /// Deletes the animal together with its photos, medical records and vaccinations
    async fn delete_animal(&self, input: DeleteAnimalRepoInput) -> DomainResult<()>;

    /// Returns the number of animals updated
    async fn set_public_visibility(&self, input: SetPublicVisibilityRepoInput)
        -> DomainResult<u64>;

    async fn animal_stats(&self) -> DomainResult<AnimalStats>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn animal() -> Animal {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        Animal {
            id: 1,
            chip_id: "123456789012345".to_string(),
            name: "Rex".to_string(),
            species: Species::Dog,
            gender: Gender::Male,
            age_numeric: None,
            age_category: None,
            injured: false,
            behavior: Behavior::Calm,
            vaccination_status: VaccinationStatus::Vaccine1,
            sterilization_status: SterilizationStatus::No,
            cage_number: 3,
            entry_date: now,
            capture_location: "Port".to_string(),
            capture_date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            finder_contact: String::new(),
            public_visibility: false,
            adoption_status: AdoptionStatus::Available,
            shelter: None,
            identity_image: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_age_prefers_numeric() {
        let mut a = animal();
        a.age_numeric = Some(4);
        a.age_category = Some(AgeCategory::Senior);
        assert_eq!(a.age(), AgeDisplay::Years(4));
        assert_eq!(serde_json::to_value(a.age()).unwrap(), serde_json::json!(4));
    }

    #[test]
    fn test_age_falls_back_to_category_label() {
        let mut a = animal();
        a.age_category = Some(AgeCategory::Puppy);
        assert_eq!(a.age().to_string(), "Κουτάβι");
        assert_eq!(
            serde_json::to_value(a.age()).unwrap(),
            serde_json::json!("Κουτάβι")
        );
    }

    #[test]
    fn test_age_placeholder_when_missing() {
        assert_eq!(animal().age().to_string(), AGE_UNSPECIFIED_LABEL);
    }

    #[test]
    fn test_identity_image_presence() {
        let mut a = animal();
        assert!(!a.has_identity_image());
        a.identity_image = Some(String::new());
        assert!(!a.has_identity_image());
        a.identity_image = Some("identity_codes/identity_123456789012345.png".to_string());
        assert!(a.has_identity_image());
    }

    #[test]
    fn test_ordering_parses_direction() {
        assert_eq!(
            "-entry_date".parse::<AnimalOrdering>().unwrap(),
            AnimalOrdering {
                field: AnimalOrderField::EntryDate,
                descending: true,
            }
        );
        let by_name: AnimalOrdering = serde_json::from_value(serde_json::json!("name")).unwrap();
        assert_eq!(by_name.field, AnimalOrderField::Name);
        assert!(!by_name.descending);

        assert!(matches!(
            "cage_number".parse::<AnimalOrdering>(),
            Err(DomainError::ValidationError(_))
        ));
        assert_eq!(AnimalOrdering::default().field.column(), "created_at");
    }
}
