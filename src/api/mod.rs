//! HTTP surface over the workflows.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{build_router, ApiState};
pub use server::start_api_server;
