//! Ownership-or-manager access control.
//!
//! One rule protects every owned resource and every account:
//! the caller may act on a resource if they own it or hold the `MANAGER` role.
//! Workflows call these helpers instead of re-deriving the check.

use crate::auth::models::{Identity, Role};
use crate::domain::UserId;

/// Check whether `identity` may act on a resource owned by `owner_id`.
///
/// # Examples
///
/// ```rust
/// use logcentral::auth::authorization::can_access;
/// use logcentral::auth::models::{Identity, Role};
/// use logcentral::domain::UserId;
///
/// let dev = Identity::new(UserId::new(3), "Dev", "dev@x.com", Role::Developer);
/// assert!(can_access(&dev, UserId::new(3)));
/// assert!(!can_access(&dev, UserId::new(9)));
///
/// let manager = Identity::new(UserId::new(1), "Boss", "boss@x.com", Role::Manager);
/// assert!(can_access(&manager, UserId::new(9)));
/// ```
pub fn can_access(identity: &Identity, owner_id: UserId) -> bool {
    identity.subject_id == owner_id || is_manager(identity)
}

/// Gate for manager-only operations.
pub fn is_manager(identity: &Identity) -> bool {
    identity.role == Role::Manager
}

/// Decide who owns a log being created.
///
/// A manager may name any owner; everybody else, including a manager who
/// names nobody, creates the entry for themselves.
pub fn resolve_log_owner(identity: &Identity, requested_owner: Option<UserId>) -> UserId {
    match requested_owner {
        Some(owner) if is_manager(identity) => owner,
        _ => identity.subject_id,
    }
}
