//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! values and map storage failures onto the port error types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module. Connections come from a `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use herdbook::outbound::persistence::{
//!     DbPool, DieselAnimalRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! run_pending_migrations("postgres://localhost/herdbook").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/herdbook")).await?;
//! let animals = DieselAnimalRepository::new(pool);
//! ```

mod diesel_animal_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod diesel_vaccine_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_animal_repository::DieselAnimalRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vaccine_repository::DieselVaccineRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
