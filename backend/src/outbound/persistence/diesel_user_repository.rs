//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Account, PasswordHash, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError, username: &Username) -> UserRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => UserRepositoryError::duplicate(username.as_ref()),
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation { .. } => {
            UserRepositoryError::query("constraint violation")
        }
    }
}

fn row_to_account(row: UserRow) -> Result<Account, UserRepositoryError> {
    let username = Username::new(&row.username).map_err(|err| {
        UserRepositoryError::query(format!("stored username is invalid: {err}"))
    })?;
    Ok(Account {
        username,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &Account) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            username: account.username.as_ref(),
            password_hash: account.password_hash.as_ref(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, &account.username))
    }

    async fn find(&self, username: &Username) -> Result<Option<Account>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(username.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, username))?;

        row.map(row_to_account).transpose()
    }
}
