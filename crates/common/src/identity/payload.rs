use crate::domain::Animal;
use serde::{Deserialize, Serialize};

/// Record type tag embedded in every payload
pub const ANIMAL_RECORD_TYPE: &str = "animal";

/// Base URL used when no domain is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Shelter name used when neither the record nor the environment names one
pub const DEFAULT_ORGANIZATION_NAME: &str = "Καταφύγιο Ζώων";

/// External values the identity payload and public URLs depend on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    base_url: String,
    organization_name: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
        }
    }
}

impl IdentitySettings {
    /// Builds settings from the configured domain and organization name.
    /// Blank values fall back to the defaults.
    pub fn new(domain: Option<&str>, organization_name: Option<&str>) -> Self {
        let base_url = domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(base_url_from_domain)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let organization_name = organization_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_ORGANIZATION_NAME)
            .to_string();

        Self {
            base_url,
            organization_name,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    /// Public path of an animal's adoption page
    pub fn public_path(animal_id: i64) -> String {
        format!("/adopt/{}/", animal_id)
    }

    pub fn public_url(&self, animal_id: i64) -> String {
        self.absolute(&Self::public_path(animal_id))
    }

    pub fn api_url(&self, animal_id: i64) -> String {
        self.absolute(&format!("/api/v1/animals/{}/", animal_id))
    }

    /// Joins a site-relative path onto the base URL
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// A domain carrying a scheme is used verbatim, a bare host is served over https
fn base_url_from_domain(domain: &str) -> String {
    let trimmed = domain.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Snapshot of an animal's public-facing attributes carried in its identity code.
///
/// Field declaration order is the serialized key order, which keeps the text
/// encoding stable for a given record state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: i64,
    pub chip_id: String,
    pub name: String,
    pub species: String,
    pub gender: String,
    pub cage: i32,
    pub shelter: String,
    pub entry_date: String,
    pub public_url: String,
    pub api_url: String,
}

impl IdentityPayload {
    pub fn from_animal(animal: &Animal, settings: &IdentitySettings) -> Self {
        let shelter = animal
            .shelter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(settings.organization_name())
            .to_string();

        Self {
            record_type: ANIMAL_RECORD_TYPE.to_string(),
            id: animal.id,
            chip_id: animal.chip_id.clone(),
            name: animal.name.clone(),
            species: animal.species.label().to_string(),
            gender: animal.gender.label().to_string(),
            cage: animal.cage_number,
            shelter,
            entry_date: animal.entry_date.to_rfc3339(),
            public_url: settings.public_url(animal.id),
            api_url: settings.api_url(animal.id),
        }
    }

    /// Compact JSON text; non-ASCII characters are kept as UTF-8
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_animal;

    #[test]
    fn test_settings_defaults() {
        let settings = IdentitySettings::new(None, Some("  "));
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.organization_name(), DEFAULT_ORGANIZATION_NAME);
    }

    #[test]
    fn test_bare_domain_gets_https() {
        let settings = IdentitySettings::new(Some("shelter.example.org/"), None);
        assert_eq!(settings.base_url(), "https://shelter.example.org");
        assert_eq!(
            settings.public_url(42),
            "https://shelter.example.org/adopt/42/"
        );
        assert_eq!(
            settings.api_url(42),
            "https://shelter.example.org/api/v1/animals/42/"
        );
    }

    #[test]
    fn test_domain_with_scheme_kept() {
        let settings = IdentitySettings::new(Some("http://10.0.0.5:8080"), None);
        assert_eq!(
            settings.absolute("/media/p1.jpg"),
            "http://10.0.0.5:8080/media/p1.jpg"
        );
    }

    #[test]
    fn test_payload_fields() {
        let settings = IdentitySettings::new(Some("shelter.example.org"), Some("Paws"));
        let animal = sample_animal(7, "123456789012345");
        let payload = IdentityPayload::from_animal(&animal, &settings);

        assert_eq!(payload.record_type, "animal");
        assert_eq!(payload.id, 7);
        assert_eq!(payload.chip_id, "123456789012345");
        assert_eq!(payload.species, "Σκύλος");
        assert_eq!(payload.gender, "Αρσενικό");
        assert_eq!(payload.shelter, "Paws");
        assert_eq!(payload.public_url, "https://shelter.example.org/adopt/7/");
    }

    #[test]
    fn test_record_shelter_overrides_organization() {
        let mut animal = sample_animal(7, "123456789012345");
        animal.shelter = Some("North Shelter".to_string());
        let payload = IdentityPayload::from_animal(&animal, &IdentitySettings::default());
        assert_eq!(payload.shelter, "North Shelter");
    }

    #[test]
    fn test_text_is_deterministic_and_ordered() {
        let settings = IdentitySettings::default();
        let animal = sample_animal(7, "123456789012345");
        let first = IdentityPayload::from_animal(&animal, &settings).to_text().unwrap();
        let second = IdentityPayload::from_animal(&animal, &settings).to_text().unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("{\"type\":\"animal\",\"id\":7,\"chip_id\":\"123456789012345\""));
        assert!(first.contains("Σκύλος"));
        assert_eq!(IdentityPayload::from_text(&first).unwrap().chip_id, animal.chip_id);
    }
}
