use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use mockable::Clock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{
    hashing::PasswordHasher, login_service::LoginService, middleware::authenticate,
    token_service::TokenService, user_service::UserService,
};
use crate::config::AuthConfig;
use crate::errors::Result;
use crate::services::LogService;
use crate::storage::DbPool;

use super::handlers::{
    archive_log_handler, create_log_handler, create_user_handler, delete_log_handler,
    delete_user_handler, get_log_handler, get_user_handler, health_handler,
    list_archived_logs_handler, list_logs_handler, list_unarchived_logs_handler,
    list_user_logs_handler, list_users_handler, login_handler, register_handler,
    update_log_handler, update_user_handler,
};

/// Shared handler state. Every field is cheap to clone.
#[derive(Clone)]
pub struct ApiState {
    pub pool: DbPool,
    pub tokens: Arc<TokenService>,
    pub login_service: Arc<LoginService>,
    pub user_service: Arc<UserService>,
    pub log_service: Arc<LogService>,
}

impl ApiState {
    /// Wire the workflows over one pool and one clock.
    pub fn from_pool(pool: DbPool, auth: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let hasher = PasswordHasher::new(auth.hash_iterations)?;
        let tokens = Arc::new(TokenService::new(
            auth.token_secret.as_bytes(),
            auth.token_ttl_seconds,
            clock.clone(),
        )?);

        Ok(Self {
            login_service: Arc::new(LoginService::with_sqlx(
                pool.clone(),
                hasher.clone(),
                tokens.clone(),
                clock.clone(),
            )),
            user_service: Arc::new(UserService::with_sqlx(pool.clone(), hasher, clock.clone())),
            log_service: Arc::new(LogService::with_sqlx(pool.clone(), clock)),
            tokens,
            pool,
        })
    }
}

pub fn build_router(state: ApiState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.tokens.clone(), authenticate);

    let secured_api = Router::new()
        .route("/api/v1/log", get(list_logs_handler).post(create_log_handler))
        .route(
            "/api/v1/log/{logId}",
            get(get_log_handler).put(update_log_handler).delete(delete_log_handler),
        )
        .route("/api/v1/log/user/{userId}", get(list_user_logs_handler))
        .route("/api/v1/log/archived/user/{userId}", get(list_archived_logs_handler))
        .route("/api/v1/log/unarchived/user/{userId}", get(list_unarchived_logs_handler))
        .route("/api/v1/log/archive/{logId}", patch(archive_log_handler))
        .route("/api/v1/user", get(list_users_handler).post(create_user_handler))
        .route(
            "/api/v1/user/{userId}",
            get(get_user_handler).put(update_user_handler).delete(delete_user_handler),
        )
        .route_layer(auth_layer);

    let public_api = Router::new()
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/register", post(register_handler))
        .route("/health", get(health_handler));

    secured_api
        .merge(public_api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
