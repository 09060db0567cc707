//! Vaccine catalogue services.
//!
//! Names are trimmed and must be at least three characters long. Uniqueness
//! and referential integrity of applications are enforced by the store; the
//! services translate the resulting port errors.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{VaccineCommand, VaccineQuery, VaccineRepository, VaccineRepositoryError};
use crate::domain::{Error, VaccineApplication, VaccineName, VaccineValidationError};

fn map_repository_error(error: VaccineRepositoryError) -> Error {
    match error {
        VaccineRepositoryError::Connection { message } => {
            Error::internal(format!("vaccine repository unavailable: {message}"))
        }
        VaccineRepositoryError::Query { message } => {
            Error::internal(format!("vaccine repository error: {message}"))
        }
        VaccineRepositoryError::Duplicate { name } => duplicate_name(&name),
        VaccineRepositoryError::UnknownReference { message } => {
            Error::unknown_reference(format!("unknown animal or vaccine: {message}"))
        }
    }
}

fn duplicate_name(name: &str) -> Error {
    Error::duplicate_key(format!("vaccine {name} already exists"))
        .with_details(json!({ "field": "name", "code": "duplicate_name" }))
}

fn invalid_name(field: &str, error: &VaccineValidationError) -> Error {
    let code = match error {
        VaccineValidationError::NameTooLong { .. } => "name_too_long",
        _ => "name_too_short",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Service implementing [`VaccineCommand`].
#[derive(Clone)]
pub struct VaccineCommandService<R> {
    vaccines: Arc<R>,
}

impl<R> VaccineCommandService<R> {
    /// Create a command service over the vaccine repository.
    pub fn new(vaccines: Arc<R>) -> Self {
        Self { vaccines }
    }
}

#[async_trait]
impl<R> VaccineCommand for VaccineCommandService<R>
where
    R: VaccineRepository,
{
    async fn add(&self, name: &str) -> Result<VaccineName, Error> {
        let name = VaccineName::new(name).map_err(|err| invalid_name("name", &err))?;
        self.vaccines
            .insert(&name)
            .await
            .map_err(map_repository_error)?;
        info!(vaccine = %name, "vaccine added to catalogue");
        Ok(name)
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<VaccineName, Error> {
        let new_name = VaccineName::new(new_name).map_err(|err| invalid_name("newName", &err))?;
        if self
            .vaccines
            .exists(new_name.as_ref())
            .await
            .map_err(map_repository_error)?
        {
            return Err(duplicate_name(new_name.as_ref()));
        }

        let old_name = old_name.trim();
        let renamed = self
            .vaccines
            .rename(old_name, &new_name)
            .await
            .map_err(map_repository_error)?;
        if !renamed {
            return Err(Error::not_found(format!("vaccine {old_name} not found")));
        }
        info!(from = old_name, to = %new_name, "vaccine renamed");
        Ok(new_name)
    }

    async fn apply(&self, application: VaccineApplication) -> Result<(), Error> {
        self.vaccines
            .record_application(&application)
            .await
            .map_err(map_repository_error)?;
        info!(
            siniiga = %application.siniiga,
            vaccine = %application.vaccine_name,
            "vaccine application recorded"
        );
        Ok(())
    }
}

/// Service implementing [`VaccineQuery`].
#[derive(Clone)]
pub struct VaccineQueryService<R> {
    vaccines: Arc<R>,
}

impl<R> VaccineQueryService<R> {
    /// Create a query service over the vaccine repository.
    pub fn new(vaccines: Arc<R>) -> Self {
        Self { vaccines }
    }
}

#[async_trait]
impl<R> VaccineQuery for VaccineQueryService<R>
where
    R: VaccineRepository,
{
    async fn list(&self) -> Result<Vec<VaccineName>, Error> {
        self.vaccines.list().await.map_err(map_repository_error)
    }
}
