//! User accounts and login credentials.
//!
//! Inbound adapters build [`Credentials`] from raw strings so the account
//! service only ever sees validated usernames and non-trivial passwords.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

/// Minimum password length accepted at registration and login.
pub const PASSWORD_MIN: usize = 6;
/// Maximum username length.
pub const USERNAME_MAX: usize = 64;

/// Validation errors for usernames and passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    PasswordTooShort { min: usize },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores"
            ),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Account name used to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl AsRef<str>) -> Result<Self, CredentialsValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(CredentialsValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(trimmed) {
            return Err(CredentialsValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated username/password pair.
///
/// The password is kept verbatim (no trimming) and zeroed on drop.
///
/// # Examples
/// ```
/// use herdbook::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" rancher_1 ", "s3cret!").unwrap();
/// assert_eq!(creds.username().as_ref(), "rancher_1");
/// assert!(Credentials::try_from_parts("rancher_1", "short").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque one-way password hash as produced by the hasher port.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: Username,
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret1", CredentialsValidationError::EmptyUsername)]
    #[case("  ", "secret1", CredentialsValidationError::EmptyUsername)]
    #[case("bad name", "secret1", CredentialsValidationError::UsernameInvalidCharacters)]
    #[case("bad-name", "secret1", CredentialsValidationError::UsernameInvalidCharacters)]
    #[case("rancher", "12345", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = Credentials::try_from_parts("rancher", "  pass  ").expect("valid");
        assert_eq!(creds.password(), "  pass  ");
    }

    #[rstest]
    fn username_length_is_bounded() {
        let long = "u".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(long),
            Err(CredentialsValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
