//! PostgreSQL-backed `AnimalRepository` implementation using Diesel ORM.
//!
//! Parent clean-up and history removal on delete are left to the schema's
//! `ON DELETE SET NULL` and `ON DELETE CASCADE` rules.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{AnimalRepository, AnimalRepositoryError};
use crate::domain::{
    Animal, AnimalDetail, AnimalDraft, AnimalSummary, AppliedVaccine, BirthWeight, Race, Siniiga,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{AnimalRow, AnimalSummaryRow, ApplicationRow, NewAnimalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{animals, vaccine_applications};

/// Diesel-backed implementation of the animal repository port.
#[derive(Clone)]
pub struct DieselAnimalRepository {
    pool: DbPool,
}

impl DieselAnimalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AnimalRepositoryError {
    AnimalRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> AnimalRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => AnimalRepositoryError::connection(message),
        DieselFailure::Query(message) => AnimalRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            AnimalRepositoryError::query("constraint violation")
        }
    }
}

fn map_insert_error(error: DieselError, siniiga: &Siniiga) -> AnimalRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => AnimalRepositoryError::duplicate(siniiga.as_ref()),
        DieselFailure::ForeignKeyViolation { constraint } => AnimalRepositoryError::unknown_parent(
            constraint.unwrap_or_else(|| "parent reference".to_owned()),
        ),
        DieselFailure::Connection(message) => AnimalRepositoryError::connection(message),
        DieselFailure::Query(message) => AnimalRepositoryError::query(message),
    }
}

fn corrupt_row(error: impl std::fmt::Display) -> AnimalRepositoryError {
    AnimalRepositoryError::query(format!("stored animal row is invalid: {error}"))
}

/// Build a `LIKE` pattern matching `fragment` literally anywhere in a value.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_animal(row: AnimalRow) -> Result<Animal, AnimalRepositoryError> {
    let AnimalRow {
        siniiga,
        race,
        birthdate,
        birth_weight,
        photo_path,
        father,
        mother,
    } = row;

    let draft = AnimalDraft {
        siniiga: Siniiga::new(siniiga).map_err(corrupt_row)?,
        race: Race::new(race).map_err(corrupt_row)?,
        birthdate,
        birth_weight: BirthWeight::new(birth_weight).map_err(corrupt_row)?,
        father: father.map(Siniiga::new).transpose().map_err(corrupt_row)?,
        mother: mother.map(Siniiga::new).transpose().map_err(corrupt_row)?,
    };
    Animal::new(draft, photo_path).map_err(corrupt_row)
}

fn row_to_summary(row: AnimalSummaryRow) -> Result<AnimalSummary, AnimalRepositoryError> {
    Ok(AnimalSummary {
        siniiga: Siniiga::new(row.siniiga).map_err(corrupt_row)?,
        race: row.race,
        birthdate: row.birthdate,
        photo_path: row.photo_path,
    })
}

fn row_to_applied_vaccine(row: ApplicationRow) -> AppliedVaccine {
    AppliedVaccine {
        vaccine_name: row.vaccine_name,
        application_date: row.application_date,
        dose: row.dose,
    }
}

fn rows_to_summaries(
    rows: Vec<AnimalSummaryRow>,
) -> Result<Vec<AnimalSummary>, AnimalRepositoryError> {
    rows.into_iter().map(row_to_summary).collect()
}

#[async_trait]
impl AnimalRepository for DieselAnimalRepository {
    async fn find_existing(&self, ids: &[Siniiga]) -> Result<Vec<Siniiga>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let keys: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();

        let found: Vec<String> = animals::table
            .filter(animals::siniiga.eq_any(keys))
            .select(animals::siniiga)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        found
            .into_iter()
            .map(|id| Siniiga::new(id).map_err(corrupt_row))
            .collect()
    }

    async fn insert(&self, animal: &Animal) -> Result<(), AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewAnimalRow {
            siniiga: animal.siniiga().as_ref(),
            race: animal.race().as_ref(),
            birthdate: animal.birthdate(),
            birth_weight: animal.birth_weight().get(),
            photo_path: animal.photo_path(),
            father: animal.father().map(AsRef::as_ref),
            mother: animal.mother().map(AsRef::as_ref),
        };

        diesel::insert_into(animals::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_insert_error(error, animal.siniiga()))
    }

    async fn list(&self) -> Result<Vec<AnimalSummary>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnimalSummaryRow> = animals::table
            .select(AnimalSummaryRow::as_select())
            .order_by(animals::siniiga)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_summaries(rows)
    }

    async fn search(&self, fragment: &str) -> Result<Vec<AnimalSummary>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnimalSummaryRow> = animals::table
            .filter(animals::siniiga.like(contains_pattern(fragment)).escape('\\'))
            .select(AnimalSummaryRow::as_select())
            .order_by(animals::siniiga)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_summaries(rows)
    }

    async fn find_detail(
        &self,
        siniiga: &Siniiga,
    ) -> Result<Option<AnimalDetail>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = siniiga.as_ref();

        // One snapshot for the record and its history.
        let (animal, history) = conn
            .transaction(|conn| {
                async move {
                    let animal: Option<AnimalRow> = animals::table
                        .find(key)
                        .select(AnimalRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    if animal.is_none() {
                        return Ok((None, Vec::new()));
                    }
                    let history: Vec<ApplicationRow> = vaccine_applications::table
                        .filter(vaccine_applications::siniiga.eq(key))
                        .select(ApplicationRow::as_select())
                        .order_by((
                            vaccine_applications::application_date.asc(),
                            vaccine_applications::id.asc(),
                        ))
                        .load(conn)
                        .await?;
                    Ok::<_, DieselError>((animal, history))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some(row) = animal else {
            return Ok(None);
        };
        Ok(Some(AnimalDetail {
            animal: row_to_animal(row)?,
            vaccines: history.into_iter().map(row_to_applied_vaccine).collect(),
        }))
    }

    async fn delete(&self, siniiga: &Siniiga) -> Result<bool, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(animals::table.find(siniiga.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
