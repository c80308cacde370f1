//! Log entry domain model.
//!
//! A log entry is the owned resource of the system: every entry belongs to
//! exactly one account through `owner_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{LogId, UserId};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Debug,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(LogFieldParseError::Level(other.to_string())),
        }
    }
}

/// Environment the entry was reported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogChannel {
    Development,
    Homologation,
    Production,
}

impl LogChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogChannel::Development => "development",
            LogChannel::Homologation => "homologation",
            LogChannel::Production => "production",
        }
    }
}

impl Display for LogChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogChannel {
    type Err = LogFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(LogChannel::Development),
            "homologation" => Ok(LogChannel::Homologation),
            "production" => Ok(LogChannel::Production),
            other => Err(LogFieldParseError::Channel(other.to_string())),
        }
    }
}

/// Error returned when a stored level or channel cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogFieldParseError {
    #[error("invalid log level: {0}")]
    Level(String),
    #[error("invalid log channel: {0}")]
    Channel(String),
}

/// Which entries an owner-scoped listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFilter {
    #[default]
    All,
    Archived,
    Unarchived,
}

impl ArchiveFilter {
    /// `None` means "do not filter on the flag".
    pub fn archived_flag(self) -> Option<bool> {
        match self {
            ArchiveFilter::All => None,
            ArchiveFilter::Archived => Some(true),
            ArchiveFilter::Unarchived => Some(false),
        }
    }
}

/// Stored representation of a log entry, joined with its owner's name.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: LogId,
    pub title: String,
    pub description: String,
    pub details: String,
    pub source: String,
    pub event_count: i32,
    pub level: LogLevel,
    pub channel: LogChannel,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
    pub owner_id: UserId,
    pub owner_name: String,
}

impl LogEntry {
    /// Flip the archived flag.
    pub fn toggle_archived(&mut self) {
        self.archived = !self.archived;
    }

    /// Overwrite the user-editable fields.
    pub fn apply(&mut self, changes: LogChanges) {
        self.title = changes.title;
        self.description = changes.description;
        self.details = changes.details;
        self.source = changes.source;
        self.event_count = changes.event_count;
        self.level = changes.level;
        self.channel = changes.channel;
    }
}

/// Editable log fields, shared by creation and update.
#[derive(Debug, Clone, PartialEq)]
pub struct LogChanges {
    pub title: String,
    pub description: String,
    pub details: String,
    pub source: String,
    pub event_count: i32,
    pub level: LogLevel,
    pub channel: LogChannel,
}

/// Log creation payload. The owner is resolved by the workflow, not taken
/// blindly from the request.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub owner_id: UserId,
    pub fields: LogChanges,
    pub created_at: DateTime<Utc>,
}

/// Outward projection of a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    pub id: LogId,
    pub title: String,
    pub description: String,
    pub details: String,
    pub source: String,
    pub event_count: i32,
    pub level: LogLevel,
    pub channel: LogChannel,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
    pub user_id: UserId,
    pub user_name: String,
}

impl From<LogEntry> for LogResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            details: entry.details,
            source: entry.source,
            event_count: entry.event_count,
            level: entry.level,
            channel: entry.channel,
            created_at: entry.created_at,
            archived: entry.archived,
            user_id: entry.owner_id,
            user_name: entry.owner_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry {
            id: LogId::new(1),
            title: "disk".into(),
            description: "disk almost full".into(),
            details: "/var at 97%".into(),
            source: "host-a".into(),
            event_count: 3,
            level: LogLevel::Warning,
            channel: LogChannel::Production,
            created_at: Utc::now(),
            archived: false,
            owner_id: UserId::new(2),
            owner_name: "Ana".into(),
        }
    }

    #[test]
    fn level_and_channel_round_trip() {
        for level in [LogLevel::Debug, LogLevel::Warning, LogLevel::Error] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
        for channel in [LogChannel::Development, LogChannel::Homologation, LogChannel::Production]
        {
            assert_eq!(channel.as_str().parse::<LogChannel>().unwrap(), channel);
        }
        assert_eq!(
            "fatal".parse::<LogLevel>().unwrap_err(),
            LogFieldParseError::Level("fatal".into())
        );
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut log = entry();
        log.toggle_archived();
        assert!(log.archived);
        log.toggle_archived();
        assert!(!log.archived);
    }

    #[test]
    fn response_keeps_owner_fields() {
        let response = LogResponse::from(entry());
        assert_eq!(response.user_id, UserId::new(2));
        assert_eq!(response.user_name, "Ana");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["eventCount"], 3);
        assert_eq!(json["level"], "WARNING");
    }

    #[test]
    fn archive_filter_flags() {
        assert_eq!(ArchiveFilter::All.archived_flag(), None);
        assert_eq!(ArchiveFilter::Archived.archived_flag(), Some(true));
        assert_eq!(ArchiveFilter::Unarchived.archived_flag(), Some(false));
    }
}
