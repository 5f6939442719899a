use crate::domain::{
    Animal, AnimalOrdering, AnimalRepository, AnimalStats, CreateAnimalRepoInput, DeleteAnimalRepoInput,
    DomainError, DomainResult, GetAnimalByChipRepoInput, GetAnimalRepoInput, ListAnimalsRepoInput,
    SetPublicVisibilityRepoInput, UpdateAnimalRepoInput, UpdateIdentityImageRepoInput,
};
use crate::postgres::PostgresClient;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;
use tokio_postgres::Row;
use tracing::{debug, instrument};

const ANIMAL_COLUMNS: &str = "id, chip_id, name, species, gender, age_numeric, age_category, injured, \
     behavior, vaccination_status, sterilization_status, cage_number, entry_date, \
     capture_location, capture_date, finder_contact, public_visibility, adoption_status, \
     shelter, identity_image, created_by, created_at, updated_at";

/// Animal row for PostgreSQL storage; choice columns hold their text codes
#[derive(Debug, Clone)]
pub struct AnimalRow {
    pub id: i64,
    pub chip_id: String,
    pub name: String,
    pub species: String,
    pub gender: String,
    pub age_numeric: Option<i32>,
    pub age_category: Option<String>,
    pub injured: bool,
    pub behavior: String,
    pub vaccination_status: String,
    pub sterilization_status: String,
    pub cage_number: i32,
    pub entry_date: DateTime<Utc>,
    pub capture_location: String,
    pub capture_date: NaiveDate,
    pub finder_contact: String,
    pub public_visibility: bool,
    pub adoption_status: String,
    pub shelter: Option<String>,
    pub identity_image: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Row> for AnimalRow {
    fn from(row: &Row) -> Self {
        AnimalRow {
            id: row.get(0),
            chip_id: row.get(1),
            name: row.get(2),
            species: row.get(3),
            gender: row.get(4),
            age_numeric: row.get(5),
            age_category: row.get(6),
            injured: row.get(7),
            behavior: row.get(8),
            vaccination_status: row.get(9),
            sterilization_status: row.get(10),
            cage_number: row.get(11),
            entry_date: row.get(12),
            capture_location: row.get(13),
            capture_date: row.get(14),
            finder_contact: row.get(15),
            public_visibility: row.get(16),
            adoption_status: row.get(17),
            shelter: row.get(18),
            identity_image: row.get(19),
            created_by: row.get(20),
            created_at: row.get(21),
            updated_at: row.get(22),
        }
    }
}

/// Stored codes that no longer parse are a storage problem, not caller input
pub(crate) fn parse_code<T>(column: &str, value: &str) -> DomainResult<T>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(|_| {
        DomainError::RepositoryError(anyhow!("invalid {} code in storage: {}", column, value))
    })
}

/// Convert database AnimalRow to domain Animal
impl TryFrom<AnimalRow> for Animal {
    type Error = DomainError;

    fn try_from(row: AnimalRow) -> Result<Self, Self::Error> {
        Ok(Animal {
            id: row.id,
            chip_id: row.chip_id,
            name: row.name,
            species: parse_code("species", &row.species)?,
            gender: parse_code("gender", &row.gender)?,
            age_numeric: row.age_numeric,
            age_category: row
                .age_category
                .as_deref()
                .map(|code| parse_code("age_category", code))
                .transpose()?,
            injured: row.injured,
            behavior: parse_code("behavior", &row.behavior)?,
            vaccination_status: parse_code("vaccination_status", &row.vaccination_status)?,
            sterilization_status: parse_code("sterilization_status", &row.sterilization_status)?,
            cage_number: row.cage_number,
            entry_date: row.entry_date,
            capture_location: row.capture_location,
            capture_date: row.capture_date,
            finder_contact: row.finder_contact,
            public_visibility: row.public_visibility,
            adoption_status: parse_code("adoption_status", &row.adoption_status)?,
            shelter: row.shelter,
            identity_image: row.identity_image,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn row_to_animal(row: &Row) -> DomainResult<Animal> {
    Animal::try_from(AnimalRow::from(row))
}

/// Escapes LIKE metacharacters so search text matches literally
/// Ordering columns come from a closed enum, never from request text
fn order_by(ordering: AnimalOrdering) -> String {
    let direction = if ordering.descending { "DESC" } else { "ASC" };
    format!(
        "ORDER BY {} {}, id {}",
        ordering.field.column(),
        direction,
        direction
    )
}

fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn animal_not_found(animal_id: i64) -> DomainError {
    DomainError::AnimalNotFound(format!("Animal not found: {}", animal_id))
}

fn map_write_error(e: tokio_postgres::Error, chip_id: &str) -> DomainError {
    if let Some(db_err) = e.as_db_error() {
        // PostgreSQL error code 23505 is unique_violation
        if db_err.code().code() == "23505" {
            return DomainError::AnimalAlreadyExists(chip_id.to_string());
        }
        // 23514 is check_violation
        if db_err.code().code() == "23514" {
            return DomainError::ValidationError(db_err.message().to_string());
        }
    }
    DomainError::RepositoryError(e.into())
}

/// PostgreSQL implementation of AnimalRepository trait
#[derive(Clone)]
pub struct PostgresAnimalRepository {
    client: PostgresClient,
}

impl PostgresAnimalRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnimalRepository for PostgresAnimalRepository {
    #[instrument(skip(self, input), fields(chip_id = %input.chip_id))]
    async fn create_animal(&self, input: CreateAnimalRepoInput) -> DomainResult<Animal> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();
        let age_category = input.age_category.map(|c| c.as_str());

        let row = conn
            .query_one(
                &format!(
                    "INSERT INTO animals (chip_id, name, species, gender, age_numeric, age_category, injured,
                        behavior, vaccination_status, sterilization_status, cage_number, entry_date,
                        capture_location, capture_date, finder_contact, public_visibility, adoption_status,
                        shelter, created_by, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $12, $12)
                     RETURNING {}",
                    ANIMAL_COLUMNS
                ),
                &[
                    &input.chip_id,
                    &input.name,
                    &input.species.as_str(),
                    &input.gender.as_str(),
                    &input.age_numeric,
                    &age_category,
                    &input.injured,
                    &input.behavior.as_str(),
                    &input.vaccination_status.as_str(),
                    &input.sterilization_status.as_str(),
                    &input.cage_number,
                    &now,
                    &input.capture_location,
                    &input.capture_date,
                    &input.finder_contact,
                    &input.public_visibility,
                    &input.adoption_status.as_str(),
                    &input.shelter,
                    &input.created_by,
                ],
            )
            .await
            .map_err(|e| map_write_error(e, &input.chip_id))?;

        let animal = row_to_animal(&row)?;
        debug!(animal_id = animal.id, "registered animal: {}", animal.chip_id);
        Ok(animal)
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn get_animal(&self, input: GetAnimalRepoInput) -> DomainResult<Option<Animal>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!("SELECT {} FROM animals WHERE id = $1", ANIMAL_COLUMNS),
                &[&input.animal_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        row.as_ref().map(row_to_animal).transpose()
    }

    #[instrument(skip(self, input), fields(chip_id = %input.chip_id))]
    async fn get_animal_by_chip_id(
        &self,
        input: GetAnimalByChipRepoInput,
    ) -> DomainResult<Option<Animal>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                &format!("SELECT {} FROM animals WHERE chip_id = $1", ANIMAL_COLUMNS),
                &[&input.chip_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        row.as_ref().map(row_to_animal).transpose()
    }

    #[instrument(skip(self, input))]
    async fn list_animals(&self, input: ListAnimalsRepoInput) -> DomainResult<Vec<Animal>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let species = input.species.map(|s| s.as_str());
        let gender = input.gender.map(|g| g.as_str());
        let behavior = input.behavior.map(|b| b.as_str());
        let statuses: Vec<&str> = input
            .adoption_statuses
            .iter()
            .map(|s| s.as_str())
            .collect();
        let search = input
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM animals
                     WHERE ($1::text IS NULL OR species = $1)
                       AND ($2::text IS NULL OR gender = $2)
                       AND ($3::text IS NULL OR behavior = $3)
                       AND (cardinality($4::text[]) = 0 OR adoption_status = ANY($4))
                       AND ($5::boolean IS NULL OR public_visibility = $5)
                       AND ($6::text IS NULL OR shelter = $6)
                       AND ($7::text IS NULL OR name ILIKE $7 OR chip_id ILIKE $7
                            OR capture_location ILIKE $7 OR shelter ILIKE $7)
                     {}",
                    ANIMAL_COLUMNS,
                    order_by(input.ordering)
                ),
                &[
                    &species,
                    &gender,
                    &behavior,
                    &statuses,
                    &input.public_visibility,
                    &input.shelter,
                    &search,
                ],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let animals = rows
            .iter()
            .map(row_to_animal)
            .collect::<DomainResult<Vec<_>>>()?;

        debug!(count = animals.len(), "listed animals");
        Ok(animals)
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn update_animal(&self, input: UpdateAnimalRepoInput) -> DomainResult<Animal> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let now = Utc::now();
        let age_category = input.age_category.map(|c| c.as_str());

        let row = conn
            .query_opt(
                &format!(
                    "UPDATE animals SET name = $2, species = $3, gender = $4, age_numeric = $5,
                        age_category = $6, injured = $7, behavior = $8, vaccination_status = $9,
                        sterilization_status = $10, cage_number = $11, capture_location = $12,
                        capture_date = $13, finder_contact = $14, public_visibility = $15,
                        adoption_status = $16, shelter = $17, updated_at = $18
                     WHERE id = $1
                     RETURNING {}",
                    ANIMAL_COLUMNS
                ),
                &[
                    &input.animal_id,
                    &input.name,
                    &input.species.as_str(),
                    &input.gender.as_str(),
                    &input.age_numeric,
                    &age_category,
                    &input.injured,
                    &input.behavior.as_str(),
                    &input.vaccination_status.as_str(),
                    &input.sterilization_status.as_str(),
                    &input.cage_number,
                    &input.capture_location,
                    &input.capture_date,
                    &input.finder_contact,
                    &input.public_visibility,
                    &input.adoption_status.as_str(),
                    &input.shelter,
                    &now,
                ],
            )
            .await
            .map_err(|e| map_write_error(e, &input.animal_id.to_string()))?;

        let animal = match row {
            Some(row) => row_to_animal(&row)?,
            None => return Err(animal_not_found(input.animal_id)),
        };

        debug!(animal_id = animal.id, "updated animal");
        Ok(animal)
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn update_identity_image(&self, input: UpdateIdentityImageRepoInput) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Leaves updated_at alone: the image is derived, not an edit
        let updated = conn
            .execute(
                "UPDATE animals SET identity_image = $2 WHERE id = $1",
                &[&input.animal_id, &input.identity_image],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if updated == 0 {
            return Err(animal_not_found(input.animal_id));
        }

        debug!(animal_id = input.animal_id, "stored identity image reference");
        Ok(())
    }

    #[instrument(skip(self, input), fields(animal_id = input.animal_id))]
    async fn delete_animal(&self, input: DeleteAnimalRepoInput) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let deleted = conn
            .execute("DELETE FROM animals WHERE id = $1", &[&input.animal_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if deleted == 0 {
            return Err(animal_not_found(input.animal_id));
        }

        debug!(animal_id = input.animal_id, "deleted animal");
        Ok(())
    }

    #[instrument(skip(self, input), fields(count = input.animal_ids.len(), public_visibility = input.public_visibility))]
    async fn set_public_visibility(
        &self,
        input: SetPublicVisibilityRepoInput,
    ) -> DomainResult<u64> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let updated = conn
            .execute(
                "UPDATE animals SET public_visibility = $1, updated_at = NOW() WHERE id = ANY($2)",
                &[&input.public_visibility, &input.animal_ids],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        debug!(updated, "changed public visibility");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn animal_stats(&self) -> DomainResult<AnimalStats> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_one(
                "SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE species = 'dog'),
                    COUNT(*) FILTER (WHERE species = 'cat'),
                    COUNT(*) FILTER (WHERE species = 'other'),
                    COUNT(*) FILTER (WHERE gender = 'male'),
                    COUNT(*) FILTER (WHERE gender = 'female'),
                    COUNT(*) FILTER (WHERE sterilization_status = 'yes'),
                    COUNT(*) FILTER (WHERE sterilization_status = 'no'),
                    COUNT(*) FILTER (WHERE sterilization_status = 'scheduled'),
                    COUNT(*) FILTER (WHERE injured),
                    COUNT(*) FILTER (WHERE NOT injured),
                    COUNT(*) FILTER (WHERE adoption_status = 'available'),
                    COUNT(*) FILTER (WHERE adoption_status = 'pending'),
                    COUNT(*) FILTER (WHERE adoption_status = 'adopted'),
                    COUNT(*) FILTER (WHERE adoption_status = 'not_for_adoption'),
                    COUNT(*) FILTER (WHERE public_visibility),
                    COUNT(*) FILTER (WHERE NOT public_visibility)
                 FROM animals",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(AnimalStats {
            total: row.get(0),
            dogs: row.get(1),
            cats: row.get(2),
            other_species: row.get(3),
            males: row.get(4),
            females: row.get(5),
            sterilized: row.get(6),
            not_sterilized: row.get(7),
            sterilization_scheduled: row.get(8),
            injured: row.get(9),
            healthy: row.get(10),
            available: row.get(11),
            pending: row.get(12),
            adopted: row.get(13),
            not_for_adoption: row.get(14),
            public: row.get(15),
            private: row.get(16),
        })
    }
}
