//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: mutex-guarded store used without a database and in tests
//! - **photos**: capability-scoped photo directory
//! - **password**: Argon2id password hashing
//!
//! Adapters translate between domain values and infrastructure
//! representations and hold no business rules.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod photos;
