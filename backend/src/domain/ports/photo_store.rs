//! Driven port for animal photo storage.

use async_trait::async_trait;

use super::define_port_error;

/// Prefix of every stored photo path.
pub const PHOTO_PATH_PREFIX: &str = "images/";

define_port_error! {
    /// Errors raised by photo stores.
    pub enum PhotoStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "photo storage failed: {message}",
        /// The requested name is not a plain file name.
        InvalidName { name: String } => "invalid photo name: {name}",
        /// No photo with this name exists.
        NotFound { name: String } => "photo {name} not found",
    }
}

/// Uploaded photo awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Extension from the client file name, unsanitised.
    pub extension: Option<String>,
    pub bytes: Vec<u8>,
}

/// Port for persisting photos referenced by animal records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store a photo under a unique name and return its relative path
    /// (`images/<name>`).
    async fn save(&self, photo: &PhotoUpload) -> Result<String, PhotoStoreError>;

    /// Remove a previously stored photo by its relative path.
    async fn remove(&self, path: &str) -> Result<(), PhotoStoreError>;

    /// Read a stored photo by bare file name.
    async fn load(&self, name: &str) -> Result<Vec<u8>, PhotoStoreError>;
}
