//! Request DTOs for the log endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{LogChanges, LogChannel, LogLevel, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    #[validate(length(min = 1, max = 60, message = "title must have 1 to 60 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "description must have 1 to 255 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "details are required"))]
    pub details: String,
    #[validate(length(min = 1, max = 60, message = "source must have 1 to 60 characters"))]
    pub source: String,
    #[validate(range(min = 1, message = "eventCount must be at least 1"))]
    pub event_count: i32,
    pub level: LogLevel,
    pub channel: LogChannel,
    /// Target owner. Only honoured for managers.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl CreateLogRequest {
    pub fn changes(&self) -> LogChanges {
        LogChanges {
            title: self.title.clone(),
            description: self.description.clone(),
            details: self.details.clone(),
            source: self.source.clone(),
            event_count: self.event_count,
            level: self.level,
            channel: self.channel,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogRequest {
    #[validate(length(min = 1, max = 60, message = "title must have 1 to 60 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "description must have 1 to 255 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "details are required"))]
    pub details: String,
    #[validate(length(min = 1, max = 60, message = "source must have 1 to 60 characters"))]
    pub source: String,
    #[validate(range(min = 1, message = "eventCount must be at least 1"))]
    pub event_count: i32,
    pub level: LogLevel,
    pub channel: LogChannel,
}

impl From<UpdateLogRequest> for LogChanges {
    fn from(request: UpdateLogRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            details: request.details,
            source: request.source,
            event_count: request.event_count,
            level: request.level,
            channel: request.channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_json() -> serde_json::Value {
        serde_json::json!({
            "title": "disk",
            "description": "disk almost full",
            "details": "/var at 97%",
            "source": "host-a",
            "eventCount": 3,
            "level": "WARNING",
            "channel": "PRODUCTION"
        })
    }

    #[test]
    fn create_request_defaults_owner() {
        let request: CreateLogRequest = serde_json::from_value(create_json()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.user_id, None);
        assert_eq!(request.changes().level, LogLevel::Warning);
    }

    #[test]
    fn create_request_rejects_bad_fields() {
        let mut json = create_json();
        json["eventCount"] = 0.into();
        let request: CreateLogRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().is_err());

        let mut json = create_json();
        json["title"] = "t".repeat(61).into();
        let request: CreateLogRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().is_err());

        let mut json = create_json();
        json["level"] = "FATAL".into();
        assert!(serde_json::from_value::<CreateLogRequest>(json).is_err());
    }

    #[test]
    fn update_request_into_changes() {
        let request: UpdateLogRequest = serde_json::from_value(create_json()).unwrap();
        let changes = LogChanges::from(request);
        assert_eq!(changes.channel, LogChannel::Production);
        assert_eq!(changes.event_count, 3);
    }
}
