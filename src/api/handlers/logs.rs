//! Log entry endpoints. Every handler runs behind the bearer middleware.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};

use crate::api::error::ApiError;
use crate::api::response::validated;
use crate::api::routes::ApiState;
use crate::auth::models::Identity;
use crate::domain::{ArchiveFilter, LogId, LogResponse, Response, UserId};
use crate::services::{CreateLogRequest, UpdateLogRequest};

type LogIdPath = Result<Path<LogId>, PathRejection>;
type UserIdPath = Result<Path<UserId>, PathRejection>;

pub async fn list_logs_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
) -> Response<Vec<LogResponse>> {
    state.log_service.list_all(&identity).await
}

pub async fn get_log_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: LogIdPath,
) -> Result<Response<LogResponse>, ApiError> {
    let Path(id) = path?;
    Ok(state.log_service.get(&identity, id).await)
}

async fn list_owner_logs(
    state: &ApiState,
    identity: &Identity,
    path: UserIdPath,
    filter: ArchiveFilter,
) -> Result<Response<Vec<LogResponse>>, ApiError> {
    let Path(owner_id) = path?;
    Ok(state.log_service.list_by_owner(identity, owner_id, filter).await)
}

pub async fn list_user_logs_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
) -> Result<Response<Vec<LogResponse>>, ApiError> {
    list_owner_logs(&state, &identity, path, ArchiveFilter::All).await
}

pub async fn list_archived_logs_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
) -> Result<Response<Vec<LogResponse>>, ApiError> {
    list_owner_logs(&state, &identity, path, ArchiveFilter::Archived).await
}

pub async fn list_unarchived_logs_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: UserIdPath,
) -> Result<Response<Vec<LogResponse>>, ApiError> {
    list_owner_logs(&state, &identity, path, ArchiveFilter::Unarchived).await
}

pub async fn create_log_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<Response<LogResponse>, ApiError> {
    let request = validated(payload)?;
    Ok(state.log_service.create(&identity, request).await)
}

pub async fn update_log_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: LogIdPath,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<Response<LogResponse>, ApiError> {
    let Path(id) = path?;
    let request = validated(payload)?;
    Ok(state.log_service.update(&identity, id, request).await)
}

pub async fn delete_log_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: LogIdPath,
) -> Result<Response<()>, ApiError> {
    let Path(id) = path?;
    Ok(state.log_service.delete(&identity, id).await)
}

pub async fn archive_log_handler(
    State(state): State<ApiState>,
    Extension(identity): Extension<Identity>,
    path: LogIdPath,
) -> Result<Response<LogResponse>, ApiError> {
    let Path(id) = path?;
    Ok(state.log_service.toggle_archive(&identity, id).await)
}
