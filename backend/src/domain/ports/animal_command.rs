//! Driving port for animal registration and removal.

use async_trait::async_trait;

use crate::domain::{Animal, AnimalDraft, Error};

use super::PhotoUpload;

/// Registration input: validated fields plus an optional photo.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterAnimalRequest {
    pub draft: AnimalDraft,
    pub photo: Option<PhotoUpload>,
}

/// Use-case port for mutating the herd.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimalCommand: Send + Sync {
    /// Validate parentage, store the photo, and insert the animal.
    async fn register(&self, request: RegisterAnimalRequest) -> Result<Animal, Error>;

    /// Delete the animal tagged `siniiga`.
    async fn delete(&self, siniiga: &str) -> Result<(), Error>;
}
