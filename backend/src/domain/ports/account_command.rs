//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Username};

/// Use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; duplicate usernames fail with `duplicate_key`.
    async fn register(&self, credentials: Credentials) -> Result<Username, Error>;

    /// Check credentials; any mismatch fails with `unauthorized`.
    async fn login(&self, credentials: Credentials) -> Result<Username, Error>;
}
