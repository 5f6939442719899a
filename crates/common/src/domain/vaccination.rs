use crate::domain::result::DomainResult;
use crate::domain::VaccineName;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Vaccination entry. Entries are append-only: once recorded they are
/// never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vaccination {
    pub id: i64,
    pub animal_id: i64,
    pub vaccine_name: VaccineName,
    pub other_vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub date_administered: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub administered_by: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vaccination {
    /// Product name for `Other`, label otherwise
    pub fn display_name(&self) -> &str {
        match (self.vaccine_name, self.other_vaccine_name.as_deref()) {
            (VaccineName::Other, Some(other)) if !other.trim().is_empty() => other,
            (name, _) => name.label(),
        }
    }
}

/// Rabies entries first, then newest administration first
pub fn sort_vaccinations(vaccinations: &mut [Vaccination]) {
    vaccinations.sort_by(|a, b| {
        let a_rabies = a.vaccine_name != VaccineName::Rabies;
        let b_rabies = b.vaccine_name != VaccineName::Rabies;
        a_rabies
            .cmp(&b_rabies)
            .then_with(|| b.date_administered.cmp(&a.date_administered))
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVaccinationRepoInput {
    pub animal_id: i64,
    pub vaccine_name: VaccineName,
    pub other_vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub date_administered: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub administered_by: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListVaccinationsRepoInput {
    pub animal_id: i64,
}

/// Repository trait for vaccination storage (append-only)
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VaccinationRepository: Send + Sync {
    async fn create_vaccination(
        &self,
        input: CreateVaccinationRepoInput,
    ) -> DomainResult<Vaccination>;

    /// Rabies first, then newest `date_administered` first
    async fn list_vaccinations(
        &self,
        input: ListVaccinationsRepoInput,
    ) -> DomainResult<Vec<Vaccination>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vaccination(id: i64, name: VaccineName, day: u32) -> Vaccination {
        Vaccination {
            id,
            animal_id: 1,
            vaccine_name: name,
            other_vaccine_name: None,
            batch_number: None,
            date_administered: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            next_due_date: None,
            administered_by: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rabies_sorted_first_then_newest() {
        let mut list = vec![
            vaccination(1, VaccineName::Other, 20),
            vaccination(2, VaccineName::Rabies, 1),
            vaccination(3, VaccineName::Other, 25),
            vaccination(4, VaccineName::Rabies, 10),
        ];
        sort_vaccinations(&mut list);
        let ids: Vec<i64> = list.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_display_name_uses_other_product_name() {
        let mut v = vaccination(1, VaccineName::Other, 1);
        assert_eq!(v.display_name(), "Άλλο");
        v.other_vaccine_name = Some("Nobivac DHPPi".to_string());
        assert_eq!(v.display_name(), "Nobivac DHPPi");
        assert_eq!(vaccination(2, VaccineName::Rabies, 1).display_name(), "Λύσσα");
    }
}
