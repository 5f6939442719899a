use common::domain::{AgeDisplay, Animal};
use common::identity::IdentitySettings;
use serde::Serialize;

/// Status line shown for animals that are not publicly listed
pub const LIMITED_STATUS: &str = "Registered in shelter system";
pub const LIMITED_MESSAGE: &str = "Contact shelter for more information";

/// Internal view returned by the staff lookup. URLs are site-relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffAnimalView {
    pub id: i64,
    pub chip_id: String,
    pub name: String,
    pub species: &'static str,
    pub gender: &'static str,
    pub age: AgeDisplay,
    pub cage_number: i32,
    pub behavior: &'static str,
    pub vaccination_status: &'static str,
    pub sterilization_status: &'static str,
    pub adoption_status: &'static str,
    pub injured: bool,
    pub photo_url: Option<String>,
    pub public_url: Option<String>,
    /// `YYYY-MM-DD`
    pub entry_date: String,
}

impl StaffAnimalView {
    pub fn new(animal: &Animal, photo_url: Option<String>) -> Self {
        Self {
            id: animal.id,
            chip_id: animal.chip_id.clone(),
            name: animal.name.clone(),
            species: animal.species.label(),
            gender: animal.gender.label(),
            age: animal.age(),
            cage_number: animal.cage_number,
            behavior: animal.behavior.label(),
            vaccination_status: animal.vaccination_status.label(),
            sterilization_status: animal.sterilization_status.label(),
            adoption_status: animal.adoption_status.label(),
            injured: animal.injured,
            photo_url,
            public_url: animal
                .public_visibility
                .then(|| IdentitySettings::public_path(animal.id)),
            entry_date: animal.entry_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Adoption-facing view of a publicly visible animal. URLs are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicAnimalView {
    pub chip_id: String,
    pub name: String,
    pub species: &'static str,
    pub gender: &'static str,
    pub age: AgeDisplay,
    pub adoption_status: &'static str,
    pub photo_url: Option<String>,
    pub public_url: String,
}

impl PublicAnimalView {
    /// `photo_path` is the site-relative URL of the display photo
    pub fn new(animal: &Animal, photo_path: Option<&str>, settings: &IdentitySettings) -> Self {
        Self {
            chip_id: animal.chip_id.clone(),
            name: animal.name.clone(),
            species: animal.species.label(),
            gender: animal.gender.label(),
            age: animal.age(),
            adoption_status: animal.adoption_status.label(),
            photo_url: photo_path.map(|path| settings.absolute(path)),
            public_url: settings.public_url(animal.id),
        }
    }
}

/// What the public lookup reveals about an animal that is not publicly listed.
/// Never carries a photo, adoption status or medical data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitedView {
    pub chip_id: String,
    pub name: String,
    pub species: &'static str,
    pub status: &'static str,
    pub message: &'static str,
}

impl LimitedView {
    pub fn new(animal: &Animal) -> Self {
        Self {
            chip_id: animal.chip_id.clone(),
            name: animal.name.clone(),
            species: animal.species.label(),
            status: LIMITED_STATUS,
            message: LIMITED_MESSAGE,
        }
    }
}

/// Result of the public lookup, shaped by the animal's visibility flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PublicLookup {
    Public(PublicAnimalView),
    Limited(LimitedView),
}
