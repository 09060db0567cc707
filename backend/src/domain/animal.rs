//! Animal records and their value objects.
//!
//! An animal is identified by its SINIIGA tag (the national livestock
//! identifier). Parentage is expressed as optional references to other
//! animals by tag.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vaccine::AppliedVaccine;

/// Maximum length of a SINIIGA tag.
pub const SINIIGA_MAX: usize = 64;
/// Maximum length of a race (breed) label.
pub const RACE_MAX: usize = 64;
/// Date format accepted and produced for birth and application dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation errors raised while building animal records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimalValidationError {
    EmptySiniiga,
    SiniigaTooLong { max: usize },
    SiniigaInvalidCharacters,
    EmptyRace,
    RaceTooLong { max: usize },
    InvalidBirthdate,
    InvalidBirthWeight,
    SameParent,
}

impl fmt::Display for AnimalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySiniiga => write!(f, "siniiga must not be empty"),
            Self::SiniigaTooLong { max } => {
                write!(f, "siniiga must be at most {max} characters")
            }
            Self::SiniigaInvalidCharacters => write!(
                f,
                "siniiga may only contain letters, numbers, or hyphens"
            ),
            Self::EmptyRace => write!(f, "race must not be empty"),
            Self::RaceTooLong { max } => write!(f, "race must be at most {max} characters"),
            Self::InvalidBirthdate => write!(f, "birthdate must be a YYYY-MM-DD date"),
            Self::InvalidBirthWeight => {
                write!(f, "birth weight must be a positive number")
            }
            Self::SameParent => write!(f, "father and mother must be different animals"),
        }
    }
}

impl std::error::Error for AnimalValidationError {}

fn siniiga_regex() -> &'static Regex {
    static SINIIGA_RE: OnceLock<Regex> = OnceLock::new();
    SINIIGA_RE.get_or_init(|| match Regex::new("^[A-Za-z0-9-]+$") {
        Ok(regex) => regex,
        Err(error) => panic!("siniiga regex failed to compile: {error}"),
    })
}

/// SINIIGA tag identifying one animal.
///
/// ## Invariants
/// - Trimmed, between 1 and [`SINIIGA_MAX`] characters.
/// - Only ASCII letters, digits, and hyphens.
///
/// # Examples
/// ```
/// use herdbook::domain::Siniiga;
///
/// let tag = Siniiga::new("  MX-1234 ").unwrap();
/// assert_eq!(tag.as_ref(), "MX-1234");
/// assert!(Siniiga::new("MX 1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Siniiga(String);

impl Siniiga {
    /// Validate and construct a tag.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AnimalValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AnimalValidationError::EmptySiniiga);
        }
        if trimmed.chars().count() > SINIIGA_MAX {
            return Err(AnimalValidationError::SiniigaTooLong { max: SINIIGA_MAX });
        }
        if !siniiga_regex().is_match(trimmed) {
            return Err(AnimalValidationError::SiniigaInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse an optional parent field where blank input means "no parent".
    pub fn optional(value: Option<&str>) -> Result<Option<Self>, AnimalValidationError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Self::new(raw).map(Some),
        }
    }
}

impl AsRef<str> for Siniiga {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Siniiga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Siniiga {
    type Error = AnimalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Siniiga> for String {
    fn from(value: Siniiga) -> Self {
        value.0
    }
}

/// Breed label for an animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Race(String);

impl Race {
    /// Validate and construct a race label.
    pub fn new(value: impl AsRef<str>) -> Result<Self, AnimalValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AnimalValidationError::EmptyRace);
        }
        if trimmed.chars().count() > RACE_MAX {
            return Err(AnimalValidationError::RaceTooLong { max: RACE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Race {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Birth weight in kilograms; always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BirthWeight(f64);

impl BirthWeight {
    pub fn new(value: f64) -> Result<Self, AnimalValidationError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(AnimalValidationError::InvalidBirthWeight)
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Parse a `YYYY-MM-DD` birthdate.
pub fn parse_birthdate(value: &str) -> Result<NaiveDate, AnimalValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AnimalValidationError::InvalidBirthdate)
}

/// Which parent slot a reference occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentRole {
    Father,
    Mother,
}

impl ParentRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
        }
    }
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated registration input before a photo is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalDraft {
    pub siniiga: Siniiga,
    pub race: Race,
    pub birthdate: NaiveDate,
    pub birth_weight: BirthWeight,
    pub father: Option<Siniiga>,
    pub mother: Option<Siniiga>,
}

impl AnimalDraft {
    /// Reject drafts naming the same animal as both parents.
    pub fn check_parents(&self) -> Result<(), AnimalValidationError> {
        match (&self.father, &self.mother) {
            (Some(father), Some(mother)) if father == mother => {
                Err(AnimalValidationError::SameParent)
            }
            _ => Ok(()),
        }
    }

    /// Provided parent references tagged with their role.
    #[must_use]
    pub fn parents(&self) -> Vec<(ParentRole, &Siniiga)> {
        [
            (ParentRole::Father, self.father.as_ref()),
            (ParentRole::Mother, self.mother.as_ref()),
        ]
        .into_iter()
        .filter_map(|(role, id)| id.map(|id| (role, id)))
        .collect()
    }
}

/// A registered animal.
///
/// ## Invariants
/// - `father` and `mother` differ when both are present.
/// - `photo_path`, when present, is relative to the content root
///   (`images/<name>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    siniiga: Siniiga,
    race: Race,
    birthdate: NaiveDate,
    birth_weight: BirthWeight,
    photo_path: Option<String>,
    father: Option<Siniiga>,
    mother: Option<Siniiga>,
}

impl Animal {
    /// Build an animal from a draft and the stored photo path.
    pub fn new(draft: AnimalDraft, photo_path: Option<String>) -> Result<Self, AnimalValidationError> {
        draft.check_parents()?;
        let AnimalDraft {
            siniiga,
            race,
            birthdate,
            birth_weight,
            father,
            mother,
        } = draft;
        Ok(Self {
            siniiga,
            race,
            birthdate,
            birth_weight,
            photo_path,
            father,
            mother,
        })
    }

    pub fn siniiga(&self) -> &Siniiga {
        &self.siniiga
    }

    pub fn race(&self) -> &Race {
        &self.race
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn birth_weight(&self) -> BirthWeight {
        self.birth_weight
    }

    pub fn photo_path(&self) -> Option<&str> {
        self.photo_path.as_deref()
    }

    pub fn father(&self) -> Option<&Siniiga> {
        self.father.as_ref()
    }

    pub fn mother(&self) -> Option<&Siniiga> {
        self.mother.as_ref()
    }

    /// Clear any parent slot pointing at `parent`, as when that animal is
    /// deleted.
    pub fn detach_parent(&mut self, parent: &Siniiga) {
        if self.father.as_ref() == Some(parent) {
            self.father = None;
        }
        if self.mother.as_ref() == Some(parent) {
            self.mother = None;
        }
    }

    /// List projection of this animal.
    #[must_use]
    pub fn summary(&self) -> AnimalSummary {
        AnimalSummary {
            siniiga: self.siniiga.clone(),
            race: self.race.as_ref().to_owned(),
            birthdate: self.birthdate,
            photo_path: self.photo_path.clone(),
        }
    }
}

/// Projection returned by list and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalSummary {
    pub siniiga: Siniiga,
    pub race: String,
    pub birthdate: NaiveDate,
    pub photo_path: Option<String>,
}

/// An animal together with its vaccination history.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalDetail {
    pub animal: Animal,
    pub vaccines: Vec<AppliedVaccine>,
}
