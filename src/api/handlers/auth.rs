//! Anonymous login and registration endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::error::ApiError;
use crate::api::response::validated;
use crate::api::routes::ApiState;
use crate::auth::user::{LoginResponse, UserResponse};
use crate::auth::validation::{LoginRequest, RegisterUserRequest};
use crate::domain::Response;

pub async fn login_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response<LoginResponse>, ApiError> {
    let request = validated(payload)?;
    Ok(state.login_service.authenticate(&request.email, &request.password).await)
}

pub async fn register_handler(
    State(state): State<ApiState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Response<UserResponse>, ApiError> {
    let request = validated(payload)?;
    Ok(state.login_service.register(request).await)
}
