//! Driven port for animal persistence.

use async_trait::async_trait;

use crate::domain::{Animal, AnimalDetail, AnimalSummary, Siniiga};

use super::define_port_error;

define_port_error! {
    /// Errors raised by animal repository adapters.
    pub enum AnimalRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "animal repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "animal repository query failed: {message}",
        /// An animal with the same tag already exists.
        Duplicate { siniiga: String } => "animal {siniiga} already exists",
        /// A referenced parent disappeared before the insert committed.
        UnknownParent { message: String } => "parent animal not found: {message}",
    }
}

/// Port for reading and writing animal records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// Return the subset of `ids` that exist, in one round trip.
    async fn find_existing(&self, ids: &[Siniiga]) -> Result<Vec<Siniiga>, AnimalRepositoryError>;

    /// Insert a new animal atomically.
    ///
    /// Fails with [`AnimalRepositoryError::Duplicate`] when the tag is taken
    /// and [`AnimalRepositoryError::UnknownParent`] when a parent reference
    /// no longer resolves.
    async fn insert(&self, animal: &Animal) -> Result<(), AnimalRepositoryError>;

    /// List every animal.
    async fn list(&self) -> Result<Vec<AnimalSummary>, AnimalRepositoryError>;

    /// Animals whose tag contains `fragment` literally and case-sensitively.
    async fn search(&self, fragment: &str) -> Result<Vec<AnimalSummary>, AnimalRepositoryError>;

    /// Load an animal with its vaccination history.
    async fn find_detail(
        &self,
        siniiga: &Siniiga,
    ) -> Result<Option<AnimalDetail>, AnimalRepositoryError>;

    /// Delete an animal; `false` when no row matched.
    async fn delete(&self, siniiga: &Siniiga) -> Result<bool, AnimalRepositoryError>;
}
