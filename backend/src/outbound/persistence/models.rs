//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into validated domain values.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{animals, users, vaccine_applications, vaccines};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Animal models
// ---------------------------------------------------------------------------

/// Full animal row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = animals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnimalRow {
    pub siniiga: String,
    pub race: String,
    pub birthdate: NaiveDate,
    pub birth_weight: f64,
    pub photo_path: Option<String>,
    pub father: Option<String>,
    pub mother: Option<String>,
}

/// Columns projected by list and search.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = animals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnimalSummaryRow {
    pub siniiga: String,
    pub race: String,
    pub birthdate: NaiveDate,
    pub photo_path: Option<String>,
}

/// Insertable struct for registering an animal.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = animals)]
pub(crate) struct NewAnimalRow<'a> {
    pub siniiga: &'a str,
    pub race: &'a str,
    pub birthdate: NaiveDate,
    pub birth_weight: f64,
    pub photo_path: Option<&'a str>,
    pub father: Option<&'a str>,
    pub mother: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Vaccine models
// ---------------------------------------------------------------------------

/// Insertable struct for catalogue entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vaccines)]
pub(crate) struct NewVaccineRow<'a> {
    pub name: &'a str,
}

/// History entry as read back for an animal's detail view.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vaccine_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub vaccine_name: String,
    pub dose: f64,
    pub application_date: NaiveDate,
}

/// Insertable struct for recording a vaccine application.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vaccine_applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub siniiga: &'a str,
    pub vaccine_name: &'a str,
    pub dose: f64,
    pub application_date: NaiveDate,
}
