//! Driving port for reading the vaccine catalogue.

use async_trait::async_trait;

use crate::domain::{Error, VaccineName};

/// Use-case port for catalogue lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaccineQuery: Send + Sync {
    /// Every catalogue entry.
    async fn list(&self) -> Result<Vec<VaccineName>, Error>;
}
