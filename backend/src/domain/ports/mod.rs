//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`PhotoStore`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod animal_command;
mod animal_query;
mod animal_repository;
mod password_hasher;
mod photo_store;
mod user_repository;
mod vaccine_command;
mod vaccine_query;
mod vaccine_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use animal_command::MockAnimalCommand;
pub use animal_command::{AnimalCommand, RegisterAnimalRequest};
pub use animal_query::AnimalQuery;
#[cfg(test)]
pub use animal_query::MockAnimalQuery;
#[cfg(test)]
pub use animal_repository::MockAnimalRepository;
pub use animal_repository::{AnimalRepository, AnimalRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use photo_store::MockPhotoStore;
pub use photo_store::{PHOTO_PATH_PREFIX, PhotoStore, PhotoStoreError, PhotoUpload};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use vaccine_command::MockVaccineCommand;
pub use vaccine_command::VaccineCommand;
#[cfg(test)]
pub use vaccine_query::MockVaccineQuery;
pub use vaccine_query::VaccineQuery;
#[cfg(test)]
pub use vaccine_repository::MockVaccineRepository;
pub use vaccine_repository::{VaccineRepository, VaccineRepositoryError};
