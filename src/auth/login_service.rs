//! Login and self-registration.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, instrument, warn};

use crate::auth::hashing::PasswordHasher;
use crate::auth::models::{Identity, Role};
use crate::auth::token_service::TokenService;
use crate::auth::user::{LoginResponse, User, UserResponse};
use crate::auth::user_service::{create_account, AccountCreation, EMAIL_IN_USE, USER_NOT_FOUND};
use crate::auth::validation::RegisterUserRequest;
use crate::domain::Response;
use crate::errors::Result;
use crate::storage::repositories::{SqlxUserRepository, UserRepository};
use crate::storage::DbPool;

pub const INVALID_CREDENTIALS: &str = "incorrect email or password";

/// Service for handling email/password authentication.
#[derive(Clone)]
pub struct LoginService {
    user_repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl LoginService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { user_repository, hasher, tokens, clock }
    }

    pub fn with_sqlx(
        pool: DbPool,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)), hasher, tokens, clock)
    }

    /// Authenticate with email and password and issue a session token.
    ///
    /// An unknown email answers 404 and a wrong password 403.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Response<LoginResponse> {
        self.try_authenticate(email, password).await.unwrap_or_else(Response::from)
    }

    async fn try_authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Response<LoginResponse>> {
        let email = User::normalize_email(email);

        let Some((user, credential)) =
            self.user_repository.get_user_with_credential(&email).await?
        else {
            warn!(email = %email, "login attempt for non-existent user");
            return Ok(Response::not_found(USER_NOT_FOUND));
        };

        if !self.hasher.verify(password, &credential.hash, &credential.salt) {
            warn!(user_id = %user.id, "login attempt with incorrect password");
            return Ok(Response::forbidden(INVALID_CREDENTIALS));
        }

        let identity = Identity::new(user.id, user.name.clone(), user.email.clone(), user.role);
        let token = self.tokens.issue(&identity)?;

        info!(user_id = %user.id, role = %user.role, "user logged in successfully");
        Ok(Response::ok(LoginResponse {
            user: user.into(),
            token,
            expires_in: self.tokens.expiry_seconds(),
        }))
    }

    /// Create a developer account for an anonymous caller.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterUserRequest) -> Response<UserResponse> {
        self.try_register(request).await.unwrap_or_else(Response::from)
    }

    async fn try_register(&self, request: RegisterUserRequest) -> Result<Response<UserResponse>> {
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
}
