pub mod auth;
pub mod health;
pub mod logs;
pub mod users;

pub use auth::{login_handler, register_handler};
pub use health::health_handler;
pub use logs::{
    archive_log_handler, create_log_handler, delete_log_handler, get_log_handler,
    list_archived_logs_handler, list_logs_handler, list_unarchived_logs_handler,
    list_user_logs_handler, update_log_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
