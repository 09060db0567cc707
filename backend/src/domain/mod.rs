//! Domain primitives, services, and ports.
//!
//! Purpose: hold the herd book's business rules independent of HTTP and
//! storage. Value objects validate on construction; services implement the
//! driving ports and talk to storage only through the driven ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - Animal types: [`Siniiga`], [`Animal`], [`AnimalDraft`], [`AnimalDetail`].
//! - Vaccine types: [`VaccineName`], [`Dose`], [`VaccineApplication`].
//! - Account types: [`Username`], [`Credentials`], [`Account`].
//! - Services: animal, vaccine, and account command/query services.

pub mod account;
mod account_service;
pub mod animal;
mod animal_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod vaccine;
mod vaccine_service;

pub use self::account::{
    Account, Credentials, CredentialsValidationError, PasswordHash, Username,
};
pub use self::account_service::AccountCommandService;
pub use self::animal::{
    Animal, AnimalDetail, AnimalDraft, AnimalSummary, AnimalValidationError, BirthWeight,
    ParentRole, Race, Siniiga, parse_birthdate,
};
pub use self::animal_service::{AnimalCommandService, AnimalQueryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::vaccine::{
    AppliedVaccine, Dose, VaccineApplication, VaccineName, VaccineValidationError,
    parse_application_date,
};
pub use self::vaccine_service::{VaccineCommandService, VaccineQueryService};
