//! Account endpoints. Every handler runs behind the bearer middleware.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};

use crate::api::error::ApiError;
use crate::api::response::validated;
use crate::api::routes::ApiState;
use crate::auth::models::Identity;
use crate::auth::user::UserResponse;
use crate::auth::validation::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{Response, UserId};

type UserIdPath = Result<Path<UserId>, PathRejection>;

pub async fn list_users_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
) -> Response<Vec<UserResponse>> {
    state.user_service.list(&identity).await
}

pub async fn get_user_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
) -> Result<Response<UserResponse>, ApiError> {
    let Path(id) = path?;
    Ok(state.user_service.get(&identity, id).await)
}

pub async fn create_user_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response<UserResponse>, ApiError> {
    let request = validated(payload)?;
    Ok(state.user_service.create(&identity, request).await)
}

pub async fn update_user_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Response<UserResponse>, ApiError> {
    let Path(id) = path?;
    let request = validated(payload)?;
    Ok(state.user_service.update(&identity, id, request).await)
}

pub async fn delete_user_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
) -> Result<Response<()>, ApiError> {
    let Path(id) = path?;
    Ok(state.user_service.delete(&identity, id).await)
}
