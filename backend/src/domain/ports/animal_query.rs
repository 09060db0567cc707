//! Driving port for reading the herd.

use async_trait::async_trait;

use crate::domain::{AnimalDetail, AnimalSummary, Error};

/// Use-case port for animal lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimalQuery: Send + Sync {
    /// Every animal, projected for listing.
    async fn list(&self) -> Result<Vec<AnimalSummary>, Error>;

    /// Animals whose tag contains `fragment`; an empty fragment matches all.
    async fn search(&self, fragment: &str) -> Result<Vec<AnimalSummary>, Error>;

    /// One animal and its vaccination history.
    async fn detail(&self, siniiga: &str) -> Result<AnimalDetail, Error>;
}
