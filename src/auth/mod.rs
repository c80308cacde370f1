//! Authentication and authorization.
//!
//! Password hashing, session tokens, the access policy, the bearer
//! middleware and the account workflows built on top of them.

pub mod authorization;
pub mod hashing;
pub mod login_service;
pub mod middleware;
pub mod models;
pub mod token_service;
pub mod user;
pub mod user_service;
pub mod validation;

pub use hashing::PasswordHasher;
pub use login_service::LoginService;
pub use models::{AuthError, Credential, Identity, Role};
pub use token_service::{Claims, TokenService};
pub use user::{LoginResponse, User, UserResponse};
pub use user_service::{create_account, AccountCreation, UserService};
pub use validation::{CreateUserRequest, LoginRequest, RegisterUserRequest, UpdateUserRequest};
