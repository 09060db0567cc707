//! PostgreSQL-backed `VaccineRepository` implementation using Diesel ORM.
//!
//! Renames rely on `ON UPDATE CASCADE` from `vaccine_applications` so
//! recorded history follows the catalogue entry.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::{VaccineApplication, VaccineName};
use crate::domain::ports::{VaccineRepository, VaccineRepositoryError};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewApplicationRow, NewVaccineRow};
use super::pool::{DbPool, PoolError};
use super::schema::{vaccine_applications, vaccines};

/// Diesel-backed implementation of the vaccine repository port.
#[derive(Clone)]
pub struct DieselVaccineRepository {
    pool: DbPool,
}

impl DieselVaccineRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VaccineRepositoryError {
    VaccineRepositoryError::connection(pool_error_message(error))
}

/// Map Diesel errors, naming `name` when a unique key is violated.
fn map_diesel_error(error: DieselError, name: &str) -> VaccineRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => VaccineRepositoryError::duplicate(name),
        DieselFailure::ForeignKeyViolation { constraint } => {
            VaccineRepositoryError::unknown_reference(
                constraint.unwrap_or_else(|| "referenced record".to_owned()),
            )
        }
        DieselFailure::Connection(message) => VaccineRepositoryError::connection(message),
        DieselFailure::Query(message) => VaccineRepositoryError::query(message),
    }
}

#[async_trait]
impl VaccineRepository for DieselVaccineRepository {
    async fn insert(&self, name: &VaccineName) -> Result<(), VaccineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(vaccines::table)
            .values(&NewVaccineRow {
                name: name.as_ref(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, name.as_ref()))
    }

    async fn rename(&self, old: &str, new: &VaccineName) -> Result<bool, VaccineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(vaccines::table.find(old))
            .set(vaccines::name.eq(new.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, new.as_ref()))?;
        Ok(updated > 0)
    }

    async fn exists(&self, name: &str) -> Result<bool, VaccineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(vaccines::table.find(name)))
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, name))
    }

    async fn list(&self) -> Result<Vec<VaccineName>, VaccineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<String> = vaccines::table
            .select(vaccines::name)
            .order_by(vaccines::name)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, ""))?;

        names
            .into_iter()
            .map(|name| {
                VaccineName::new(name).map_err(|err| {
                    VaccineRepositoryError::query(format!("stored vaccine name is invalid: {err}"))
                })
            })
            .collect()
    }

    async fn record_application(
        &self,
        application: &VaccineApplication,
    ) -> Result<(), VaccineRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewApplicationRow {
            siniiga: application.siniiga.as_ref(),
            vaccine_name: application.vaccine_name.as_ref(),
            dose: application.dose.get(),
            application_date: application.application_date,
        };

        diesel::insert_into(vaccine_applications::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, application.vaccine_name.as_ref()))
    }
}
