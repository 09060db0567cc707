//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every field-level failure becomes an `invalid_request` error carrying
//! `details: {field, code}` so clients can highlight the offending input.

use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AnimalValidationError, CredentialsValidationError, Error, VaccineValidationError,
};

/// Machine-readable validation codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldCode {
    MissingField,
    Empty,
    TooShort,
    TooLong,
    InvalidCharacters,
    InvalidDate,
    InvalidNumber,
    NotPositive,
    SameParent,
    NameTooShort,
    NameTooLong,
}

impl FieldCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidCharacters => "invalid_characters",
            Self::InvalidDate => "invalid_date",
            Self::InvalidNumber => "invalid_number",
            Self::NotPositive => "not_positive",
            Self::SameParent => "same_parent",
            Self::NameTooShort => "name_too_short",
            Self::NameTooLong => "name_too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: FieldCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        FieldCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Reject absent or blank required values.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn animal_field_error(field: FieldName, error: &AnimalValidationError) -> Error {
    let code = match error {
        AnimalValidationError::EmptySiniiga | AnimalValidationError::EmptyRace => FieldCode::Empty,
        AnimalValidationError::SiniigaTooLong { .. } | AnimalValidationError::RaceTooLong { .. } => {
            FieldCode::TooLong
        }
        AnimalValidationError::SiniigaInvalidCharacters => FieldCode::InvalidCharacters,
        AnimalValidationError::InvalidBirthdate => FieldCode::InvalidDate,
        AnimalValidationError::InvalidBirthWeight => FieldCode::NotPositive,
        AnimalValidationError::SameParent => FieldCode::SameParent,
    };
    field_error(field, code, format!("{}: {error}", field.as_str()))
}

pub(crate) fn vaccine_field_error(field: FieldName, error: &VaccineValidationError) -> Error {
    let code = match error {
        VaccineValidationError::NameTooShort { .. } => FieldCode::NameTooShort,
        VaccineValidationError::NameTooLong { .. } => FieldCode::NameTooLong,
        VaccineValidationError::InvalidDose => FieldCode::NotPositive,
        VaccineValidationError::InvalidApplicationDate => FieldCode::InvalidDate,
    };
    field_error(field, code, error.to_string())
}

pub(crate) fn credentials_error(error: &CredentialsValidationError) -> Error {
    let (field, code) = match error {
        CredentialsValidationError::EmptyUsername => ("username", FieldCode::Empty),
        CredentialsValidationError::UsernameTooLong { .. } => ("username", FieldCode::TooLong),
        CredentialsValidationError::UsernameInvalidCharacters => {
            ("username", FieldCode::InvalidCharacters)
        }
        CredentialsValidationError::PasswordTooShort { .. } => ("password", FieldCode::TooShort),
    };
    field_error(FieldName::new(field), code, error.to_string())
}

/// Numeric input sent either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub(crate) fn parse(&self, field: FieldName) -> Result<f64, Error> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => parse_number(raw, field),
        }
    }
}

pub(crate) fn parse_number(raw: &str, field: FieldName) -> Result<f64, Error> {
    let name = field.as_str();
    raw.trim().parse::<f64>().map_err(|_| {
        field_error(
            field,
            FieldCode::InvalidNumber,
            format!("{name} must be a number"),
        )
    })
}
