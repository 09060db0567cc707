//! Driven port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        Duplicate { username: String } => "user {username} already exists",
    }
}

/// Port for storing and looking up accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, account: &Account) -> Result<(), UserRepositoryError>;

    /// Fetch an account by username.
    async fn find(&self, username: &Username) -> Result<Option<Account>, UserRepositoryError>;
}
