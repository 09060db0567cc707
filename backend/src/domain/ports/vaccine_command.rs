//! Driving port for catalogue maintenance and vaccine applications.

use async_trait::async_trait;

use crate::domain::{Error, VaccineApplication, VaccineName};

/// Use-case port for mutating the vaccine catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaccineCommand: Send + Sync {
    /// Add a catalogue entry from a raw name.
    async fn add(&self, name: &str) -> Result<VaccineName, Error>;

    /// Rename a catalogue entry; applications follow the new name.
    async fn rename(&self, old_name: &str, new_name: &str) -> Result<VaccineName, Error>;

    /// Record that a vaccine was given to an animal.
    async fn apply(&self, application: VaccineApplication) -> Result<(), Error>;
}
