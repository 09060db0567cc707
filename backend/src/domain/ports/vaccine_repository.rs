//! Driven port for the vaccine catalogue and application records.

use async_trait::async_trait;

use crate::domain::{VaccineApplication, VaccineName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vaccine repository adapters.
    pub enum VaccineRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "vaccine repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "vaccine repository query failed: {message}",
        /// The catalogue already holds this name.
        Duplicate { name: String } => "vaccine {name} already exists",
        /// An application named an unknown animal or vaccine.
        UnknownReference { message: String } => "unknown reference: {message}",
    }
}

/// Port for catalogue maintenance and application records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaccineRepository: Send + Sync {
    /// Add a catalogue entry.
    async fn insert(&self, name: &VaccineName) -> Result<(), VaccineRepositoryError>;

    /// Rename `old` to `new`, carrying existing applications along.
    ///
    /// Returns `false` when `old` is not in the catalogue.
    async fn rename(&self, old: &str, new: &VaccineName) -> Result<bool, VaccineRepositoryError>;

    /// Whether the catalogue holds `name`.
    async fn exists(&self, name: &str) -> Result<bool, VaccineRepositoryError>;

    /// Every catalogue entry.
    async fn list(&self) -> Result<Vec<VaccineName>, VaccineRepositoryError>;

    /// Record that a vaccine was administered.
    async fn record_application(
        &self,
        application: &VaccineApplication,
    ) -> Result<(), VaccineRepositoryError>;
}
