//! Animal registration and query services.
//!
//! Registration runs as a short-circuiting pipeline:
//! 1. reject identical father and mother,
//! 2. look up every provided parent in one batch and report all missing roles,
//! 3. store the photo, if any,
//! 4. insert the record.
//!
//! The store's primary and foreign keys back up steps 2 and 4, so a parent
//! deleted or a tag claimed between the check and the insert still fails the
//! request cleanly. A photo written for a failed insert is removed again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AnimalCommand, AnimalQuery, AnimalRepository, AnimalRepositoryError, PhotoStore,
    PhotoStoreError, RegisterAnimalRequest,
};
use crate::domain::{
    Animal, AnimalDetail, AnimalDraft, AnimalSummary, AnimalValidationError, Error, ParentRole,
    Siniiga,
};

fn map_animal_repository_error(error: AnimalRepositoryError) -> Error {
    match error {
        AnimalRepositoryError::Connection { message } => {
            Error::internal(format!("animal repository unavailable: {message}"))
        }
        AnimalRepositoryError::Query { message } => {
            Error::internal(format!("animal repository error: {message}"))
        }
        AnimalRepositoryError::Duplicate { siniiga } => {
            Error::duplicate_key(format!("an animal with siniiga {siniiga} already exists"))
                .with_details(json!({ "field": "siniiga", "code": "duplicate_siniiga" }))
        }
        AnimalRepositoryError::UnknownParent { message } => {
            Error::unknown_reference(format!("parent animal not found: {message}"))
        }
    }
}

fn map_photo_error(error: PhotoStoreError) -> Error {
    Error::internal(format!("photo storage failed: {error}"))
}

fn same_parent_error() -> Error {
    Error::invalid_request(AnimalValidationError::SameParent.to_string())
        .with_details(json!({ "field": "mother", "code": "same_parent" }))
}

fn missing_parents_error(missing: &[ParentRole]) -> Error {
    let roles: Vec<&str> = missing.iter().map(|role| role.as_str()).collect();
    Error::unknown_reference(format!(
        "no animal exists with the siniiga given for {}",
        roles.join(" and ")
    ))
    .with_details(json!({ "missing": roles }))
}

fn not_found(siniiga: &str) -> Error {
    Error::not_found(format!("animal {siniiga} not found"))
}

/// Service implementing [`AnimalCommand`].
#[derive(Clone)]
pub struct AnimalCommandService<R, P> {
    animals: Arc<R>,
    photos: Arc<P>,
}

impl<R, P> AnimalCommandService<R, P> {
    /// Create a command service over the animal repository and photo store.
    pub fn new(animals: Arc<R>, photos: Arc<P>) -> Self {
        Self { animals, photos }
    }
}

impl<R, P> AnimalCommandService<R, P>
where
    R: AnimalRepository,
    P: PhotoStore,
{
    async fn ensure_parents_exist(&self, draft: &AnimalDraft) -> Result<(), Error> {
        let parents = draft.parents();
        if parents.is_empty() {
            return Ok(());
        }

        let ids: Vec<Siniiga> = parents.iter().map(|(_, id)| (*id).clone()).collect();
        let existing = self
            .animals
            .find_existing(&ids)
            .await
            .map_err(map_animal_repository_error)?;

        let missing: Vec<ParentRole> = parents
            .iter()
            .filter(|(_, id)| !existing.contains(*id))
            .map(|(role, _)| *role)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing_parents_error(&missing))
        }
    }

    async fn discard_photo(&self, path: Option<&str>) {
        let Some(path) = path else {
            return;
        };
        if let Err(error) = self.photos.remove(path).await {
            warn!(%error, path, "failed to remove photo after rejected registration");
        }
    }
}

#[async_trait]
impl<R, P> AnimalCommand for AnimalCommandService<R, P>
where
    R: AnimalRepository,
    P: PhotoStore,
{
    async fn register(&self, request: RegisterAnimalRequest) -> Result<Animal, Error> {
        let RegisterAnimalRequest { draft, photo } = request;
        draft.check_parents().map_err(|_| same_parent_error())?;
        self.ensure_parents_exist(&draft).await?;

        let photo_path = match photo {
            Some(photo) => Some(self.photos.save(&photo).await.map_err(map_photo_error)?),
            None => None,
        };

        let animal = match Animal::new(draft, photo_path.clone()) {
            Ok(animal) => animal,
            Err(_) => {
                self.discard_photo(photo_path.as_deref()).await;
                return Err(same_parent_error());
            }
        };

        if let Err(error) = self.animals.insert(&animal).await {
            self.discard_photo(photo_path.as_deref()).await;
            return Err(map_animal_repository_error(error));
        }

        info!(siniiga = %animal.siniiga(), "animal registered");
        Ok(animal)
    }

    async fn delete(&self, siniiga: &str) -> Result<(), Error> {
        let id = Siniiga::new(siniiga).map_err(|_| not_found(siniiga))?;
        let deleted = self
            .animals
            .delete(&id)
            .await
            .map_err(map_animal_repository_error)?;
        if !deleted {
            return Err(not_found(id.as_ref()));
        }
        info!(siniiga = %id, "animal deleted");
        Ok(())
    }
}

/// Service implementing [`AnimalQuery`].
#[derive(Clone)]
pub struct AnimalQueryService<R> {
    animals: Arc<R>,
}

impl<R> AnimalQueryService<R> {
    /// Create a query service over the animal repository.
    pub fn new(animals: Arc<R>) -> Self {
        Self { animals }
    }
}

#[async_trait]
impl<R> AnimalQuery for AnimalQueryService<R>
where
    R: AnimalRepository,
{
    async fn list(&self) -> Result<Vec<AnimalSummary>, Error> {
        self.animals
            .list()
            .await
            .map_err(map_animal_repository_error)
    }

    async fn search(&self, fragment: &str) -> Result<Vec<AnimalSummary>, Error> {
        self.animals
            .search(fragment)
            .await
            .map_err(map_animal_repository_error)
    }

    async fn detail(&self, siniiga: &str) -> Result<AnimalDetail, Error> {
        // A malformed tag can never have been stored.
        let id = Siniiga::new(siniiga).map_err(|_| not_found(siniiga))?;
        self.animals
            .find_detail(&id)
            .await
            .map_err(map_animal_repository_error)?
            .ok_or_else(|| not_found(id.as_ref()))
    }
}

#[cfg(test)]
#[path = "animal_service_tests.rs"]
mod tests;
