//! Account registration and login service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, PasswordHasher, PasswordHasherError, UserRepository, UserRepositoryError,
};
use crate::domain::{Account, Credentials, Error, Username};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Duplicate { username } => {
            Error::duplicate_key(format!("username {username} is already registered"))
                .with_details(json!({ "field": "username", "code": "duplicate_username" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountCommandService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountCommandService<R, H> {
    /// Create an account service over the user repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<R, H> AccountCommand for AccountCommandService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, credentials: Credentials) -> Result<Username, Error> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .map_err(map_hasher_error)?;
        let account = Account {
            username: credentials.username().clone(),
            password_hash,
        };
        self.users
            .insert(&account)
            .await
            .map_err(map_repository_error)?;
        info!(username = %account.username, "account registered");
        Ok(account.username)
    }

    async fn login(&self, credentials: Credentials) -> Result<Username, Error> {
        let Some(account) = self
            .users
            .find(credentials.username())
            .await
            .map_err(map_repository_error)?
        else {
            return Err(invalid_credentials());
        };

        match self
            .hasher
            .verify(credentials.password(), &account.password_hash)
        {
            Ok(true) => Ok(account.username),
            Ok(false) => Err(invalid_credentials()),
            Err(error) => {
                warn!(%error, username = %account.username, "stored password hash rejected");
                Err(invalid_credentials())
            }
        }
    }
}
