//! Domain layer
//!
//! Pure domain entities with no HTTP or database dependencies beyond the
//! sqlx encoding of identifiers.
//!
//! - `id`: type-safe integer identifiers
//! - `log`: the owned log entry resource
//! - `response`: the uniform workflow result envelope

pub mod id;
pub mod log;
pub mod response;

pub use id::{LogId, UserId};
pub use log::{
    ArchiveFilter, LogChanges, LogChannel, LogEntry, LogFieldParseError, LogLevel, LogResponse,
    NewLogEntry,
};
pub use response::{Response, ResponseCode};
