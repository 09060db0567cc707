//! Vaccine catalogue entries and recorded applications.

use std::fmt;

use chrono::NaiveDate;

use super::animal::{DATE_FORMAT, Siniiga};

/// Minimum trimmed length of a vaccine name.
pub const VACCINE_NAME_MIN: usize = 3;
/// Maximum trimmed length of a vaccine name.
pub const VACCINE_NAME_MAX: usize = 128;

/// Validation errors for vaccine names and applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaccineValidationError {
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    InvalidDose,
    InvalidApplicationDate,
}

impl fmt::Display for VaccineValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort { min } => {
                write!(f, "vaccine name must be at least {min} characters")
            }
            Self::NameTooLong { max } => {
                write!(f, "vaccine name must be at most {max} characters")
            }
            Self::InvalidDose => write!(f, "dose must be a positive number"),
            Self::InvalidApplicationDate => {
                write!(f, "application date must be a YYYY-MM-DD date")
            }
        }
    }
}

impl std::error::Error for VaccineValidationError {}

/// Catalogue name of a vaccine.
///
/// ## Invariants
/// - Trimmed, between [`VACCINE_NAME_MIN`] and [`VACCINE_NAME_MAX`] characters.
///
/// # Examples
/// ```
/// use herdbook::domain::VaccineName;
///
/// assert_eq!(VaccineName::new("  BVD ").unwrap().as_ref(), "BVD");
/// assert!(VaccineName::new("ab").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaccineName(String);

impl VaccineName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, VaccineValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if length < VACCINE_NAME_MIN {
            return Err(VaccineValidationError::NameTooShort {
                min: VACCINE_NAME_MIN,
            });
        }
        if length > VACCINE_NAME_MAX {
            return Err(VaccineValidationError::NameTooLong {
                max: VACCINE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for VaccineName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VaccineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administered amount in millilitres; finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dose(f64);

impl Dose {
    pub fn new(value: f64) -> Result<Self, VaccineValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(VaccineValidationError::InvalidDose)
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Parse a `YYYY-MM-DD` application date.
pub fn parse_application_date(value: &str) -> Result<NaiveDate, VaccineValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| VaccineValidationError::InvalidApplicationDate)
}

/// Request to record that `vaccine_name` was given to `siniiga`.
#[derive(Debug, Clone, PartialEq)]
pub struct VaccineApplication {
    pub siniiga: Siniiga,
    pub vaccine_name: VaccineName,
    pub dose: Dose,
    pub application_date: NaiveDate,
}

/// One entry of an animal's vaccination history.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedVaccine {
    pub vaccine_name: String,
    pub application_date: NaiveDate,
    pub dose: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ab")]
    #[case("  ab  ")]
    #[case("")]
    fn short_names_are_rejected(#[case] input: &str) {
        assert_eq!(
            VaccineName::new(input),
            Err(VaccineValidationError::NameTooShort {
                min: VACCINE_NAME_MIN
            })
        );
    }

    #[rstest]
    #[case("BVD", "BVD")]
    #[case("  Rabies ", "Rabies")]
    fn names_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(VaccineName::new(input).expect("valid name").as_ref(), expected);
    }

    #[rstest]
    fn long_names_are_rejected() {
        assert_eq!(
            VaccineName::new("v".repeat(VACCINE_NAME_MAX + 1)),
            Err(VaccineValidationError::NameTooLong {
                max: VACCINE_NAME_MAX
            })
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn dose_must_be_positive(#[case] value: f64) {
        assert_eq!(Dose::new(value), Err(VaccineValidationError::InvalidDose));
    }

    #[rstest]
    fn application_date_parses_iso_dates() {
        let date = parse_application_date("2024-05-06").expect("valid date");
        assert_eq!(date.to_string(), "2024-05-06");
        assert!(parse_application_date("06-05-2024").is_err());
    }
}
