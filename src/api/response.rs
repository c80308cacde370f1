//! Envelope to HTTP conversion and body extraction.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::api::error::ApiError;
use crate::domain::Response;
use crate::errors::Error;

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.code()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self)).into_response()
    }
}

/// Unwrap a JSON body and run its `validator` rules.
pub fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload?;
    body.validate().map_err(|err| ApiError::from(Error::from(err)))?;
    Ok(body)
}
