//! Account repository
//!
//! CRUD operations over the `users` table. Credentials are only ever read
//! through [`UserRepository::get_user_with_credential`].

use crate::auth::models::{Credential, Role};
use crate::auth::user::{NewUser, UpdateUser, User};
use crate::domain::UserId;
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct UserCredentialRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub hash: String,
    pub salt: String,
}

const USER_COLUMNS: &str = "id, name, email, role, created_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new account. A taken email surfaces as [`Error::Conflict`].
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get an account by ID
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Get an account by email, ignoring case
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get an account together with its credential for authentication
    async fn get_user_with_credential(&self, email: &str) -> Result<Option<(User, Credential)>>;

    /// List every account
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Update name and, when present, the credential. Returns whether a row changed.
    async fn update_user(&self, id: UserId, update: UpdateUser) -> Result<bool>;

    /// Delete an account and, through the foreign key, its logs
    async fn delete_user(&self, id: UserId) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        let role = Role::from_str(&row.role)
            .map_err(|_| Error::validation(format!("Unknown user role '{}'", row.role)))?;

        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(user_email = %user.email), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, hash, salt, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.credential.hash)
        .bind(&user.credential.salt)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::conflict(format!("email {} already in use", user.email))
            }
            other => Error::database(other, "Failed to create user"),
        })?;

        self.get_user(UserId::new(id))
            .await?
            .ok_or_else(|| Error::not_found("User", id))
    }

    #[instrument(skip(self), fields(user_id = %id), name = "db_get_user")]
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user"))?;

        row.map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self), name = "db_get_user_by_email")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1 COLLATE NOCASE",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user by email"))?;

        row.map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self), name = "db_get_user_with_credential")]
    async fn get_user_with_credential(&self, email: &str) -> Result<Option<(User, Credential)>> {
        let row = sqlx::query_as::<_, UserCredentialRow>(&format!(
            "SELECT {}, hash, salt FROM users WHERE email = $1 COLLATE NOCASE",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user credential"))?;

        row.map(|r| {
            let credential = Credential { hash: r.hash, salt: r.salt };
            Self::row_to_user(r.user).map(|user| (user, credential))
        })
        .transpose()
    }

    #[instrument(skip(self), name = "db_list_users")]
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list users"))?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    #[instrument(skip(self, update), fields(user_id = %id, password_changed = update.credential.is_some()), name = "db_update_user")]
    async fn update_user(&self, id: UserId, update: UpdateUser) -> Result<bool> {
        let result = match update.credential {
            Some(credential) => {
                sqlx::query("UPDATE users SET name = $1, hash = $2, salt = $3 WHERE id = $4")
                    .bind(&update.name)
                    .bind(&credential.hash)
                    .bind(&credential.salt)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            None => {
                sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
                    .bind(&update.name)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|err| Error::database(err, "Failed to update user"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(user_id = %id), name = "db_delete_user")]
    async fn delete_user(&self, id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
