//! Uniform result envelope returned by every workflow operation.
//!
//! Clients branch on `code`; `message` is human text and not part of the
//! contract.

use serde::Serialize;

use crate::errors::Error;

/// Status families a workflow can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    Conflict,
}

impl ResponseCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::BadRequest => 400,
            ResponseCode::Forbidden => 403,
            ResponseCode::NotFound => 404,
            ResponseCode::Conflict => 409,
        }
    }
}

/// `{ code, message?, data? }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Response<T> {
    fn new(code: ResponseCode, message: Option<String>, data: Option<T>) -> Self {
        Self { code: code.as_u16(), message, data }
    }

    /// 200 carrying a payload.
    pub fn ok(data: T) -> Self {
        Self::new(ResponseCode::Ok, None, Some(data))
    }

    /// 200 carrying only a confirmation message.
    pub fn ok_message<S: Into<String>>(message: S) -> Self {
        Self::new(ResponseCode::Ok, Some(message.into()), None)
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(ResponseCode::BadRequest, Some(message.into()), None)
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::new(ResponseCode::Forbidden, Some(message.into()), None)
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(ResponseCode::NotFound, Some(message.into()), None)
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::new(ResponseCode::Conflict, Some(message.into()), None)
    }

    /// Storage accepted the call but reported no affected rows.
    pub fn unknown_error() -> Self {
        Self::bad_request("unknown error")
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn is_ok(&self) -> bool {
        self.code == ResponseCode::Ok.as_u16()
    }
}

impl<T> From<Error> for Response<T> {
    /// Boundary conversion: the code comes from [`Error::status_code`] and the
    /// message from the failure itself.
    fn from(error: Error) -> Self {
        let message = match &error {
            Error::NotFound { resource_type, .. } => {
                format!("{} not found", resource_type.to_lowercase())
            }
            other => other.to_string(),
        };
        Self { code: error.status_code(), message: Some(message), data: None }
    }
}
