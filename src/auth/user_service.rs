//! Account workflows.
//!
//! Listing and creating accounts is reserved to managers; reading, updating
//! and deleting a single account follows the ownership-or-manager rule.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, instrument, warn};

use crate::auth::authorization::{can_access, is_manager};
use crate::auth::hashing::PasswordHasher;
use crate::auth::models::{Identity, Role};
use crate::auth::user::{NewUser, UpdateUser, User, UserResponse};
use crate::auth::validation::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{Response, UserId};
use crate::errors::{Error, Result};
use crate::storage::repositories::{SqlxUserRepository, UserRepository};
use crate::storage::DbPool;

pub const EMAIL_IN_USE: &str = "email already in use";
pub const USER_NOT_FOUND: &str = "user not found";

/// Outcome of inserting an account.
#[derive(Debug)]
pub enum AccountCreation {
    Created(User),
    EmailTaken,
}

/// Shared account insertion used by registration, manager creation and the CLI.
///
/// The email is normalized, checked for conflicts and the password hashed
/// under a fresh salt before anything is written.
#[instrument(skip(repository, hasher, clock, name, password))]
pub async fn create_account(
    repository: &dyn UserRepository,
    hasher: &PasswordHasher,
    clock: &dyn Clock,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<AccountCreation> {
    let email = User::normalize_email(email);

    if repository.get_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "account creation rejected: email already in use");
        return Ok(AccountCreation::EmailTaken);
    }

    let credential = hasher.hash(password)?;
    let created = repository
        .create_user(NewUser {
            name: name.to_string(),
            email: email.clone(),
            credential,
            role,
            created_at: clock.utc(),
        })
        .await;

    // A concurrent insert can win between the lookup and this write.
    let user = match created {
        Ok(user) => user,
        Err(Error::Conflict(_)) => {
            warn!(email = %email, "account creation rejected: email taken concurrently");
            return Ok(AccountCreation::EmailTaken);
        }
        Err(err) => return Err(err),
    };

    info!(user_id = %user.id, role = %user.role, "account created");
    Ok(AccountCreation::Created(user))
}

/// Service for managing accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { user_repository, hasher, clock }
    }

    pub fn with_sqlx(pool: DbPool, hasher: PasswordHasher, clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)), hasher, clock)
    }

    /// List every account. Managers only.
    #[instrument(skip(self, identity), fields(caller = %identity.subject_id))]
    pub async fn list(&self, identity: &Identity) -> Response<Vec<UserResponse>> {
        self.try_list(identity).await.unwrap_or_else(Response::from)
    }

    async fn try_list(&self, identity: &Identity) -> Result<Response<Vec<UserResponse>>> {
        if !is_manager(identity) {
            return Ok(Response::forbidden("only managers can list users"));
        }

        let users = self.user_repository.list_users().await?;
        Ok(Response::ok(users.into_iter().map(UserResponse::from).collect()))
    }

    #[instrument(skip(self, identity, id), fields(caller = %identity.subject_id, user_id = %id))]
    pub async fn get(&self, identity: &Identity, id: UserId) -> Response<UserResponse> {
        self.try_get(identity, id).await.unwrap_or_else(Response::from)
    }

    async fn try_get(&self, identity: &Identity, id: UserId) -> Result<Response<UserResponse>> {
        let Some(user) = self.user_repository.get_user(id).await? else {
            return Ok(Response::not_found(USER_NOT_FOUND));
        };

        if !can_access(identity, user.id) {
            return Ok(Response::forbidden("cannot read another user's information"));
        }

        Ok(Response::ok(user.into()))
    }

    /// Create a developer account on behalf of a manager.
    #[instrument(skip(self, identity, request), fields(caller = %identity.subject_id))]
    pub async fn create(
        &self,
        identity: &Identity,
        request: CreateUserRequest,
    ) -> Response<UserResponse> {
        self.try_create(identity, request).await.unwrap_or_else(Response::from)
    }

    async fn try_create(
        &self,
        identity: &Identity,
        request: CreateUserRequest,
    ) -> Result<Response<UserResponse>> {
        if !is_manager(identity) {
            return Ok(Response::forbidden("only managers can create users"));
        }

        let outcome = create_account(
            self.user_repository.as_ref(),
            &self.hasher,
            self.clock.as_ref(),
            &request.name,
            &request.email,
            &request.password,
            Role::Developer,
        )
        .await?;

        Ok(match outcome {
            AccountCreation::Created(user) => Response::ok(user.into()),
            AccountCreation::EmailTaken => Response::conflict(EMAIL_IN_USE),
        })
    }

    /// Rename an account and optionally replace its password.
    #[instrument(skip(self, identity, id, request), fields(caller = %identity.subject_id, user_id = %id))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Response<UserResponse> {
        self.try_update(identity, id, request).await.unwrap_or_else(Response::from)
    }

    async fn try_update(
        &self,
        identity: &Identity,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<Response<UserResponse>> {
        let Some(mut user) = self.user_repository.get_user(id).await? else {
            return Ok(Response::not_found(USER_NOT_FOUND));
        };

        if !can_access(identity, user.id) {
            return Ok(Response::forbidden("cannot update another user's information"));
        }

        let credential = request.new_password().map(|p| self.hasher.hash(p)).transpose()?;
        let update = UpdateUser { name: request.name, credential };

        user.name = update.name.clone();
        if !self.user_repository.update_user(user.id, update).await? {
            return Ok(Response::unknown_error());
        }

        Ok(Response::ok(user.into()))
    }

    /// Delete an account together with its logs.
    #[instrument(skip(self, identity, id), fields(caller = %identity.subject_id, user_id = %id))]
    pub async fn delete(&self, identity: &Identity, id: UserId) -> Response<()> {
        self.try_delete(identity, id).await.unwrap_or_else(Response::from)
    }

    async fn try_delete(&self, identity: &Identity, id: UserId) -> Result<Response<()>> {
        let Some(user) = self.user_repository.get_user(id).await? else {
            return Ok(Response::not_found(USER_NOT_FOUND));
        };

        if !can_access(identity, user.id) {
            return Ok(Response::forbidden("cannot delete another user's information"));
        }

        if !self.user_repository.delete_user(user.id).await? {
            return Ok(Response::unknown_error());
        }

        info!(user_id = %user.id, "account deleted");
        Ok(Response::ok_message("user deleted"))
    }
}
