//! Resource-level ownership rules, checked by handlers after the resource is loaded

use crate::{auth::middleware::AuthContext, error::AppError};
use uuid::Uuid;

/// A resource with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Owner or any admin may manage the resource
pub fn can_manage<R: Owned + ?Sized>(identity: &AuthContext, resource: &R) -> bool {
    resource.owner_id() == identity.id || identity.is_admin()
}

/// `can_manage` as an early-return check
pub fn ensure_can_manage<R: Owned + ?Sized>(
    identity: &AuthContext,
    resource: &R,
    message: &str,
) -> Result<(), AppError> {
    if can_manage(identity, resource) {
        Ok(())
    } else {
        tracing::warn!(user_id = %identity.id, owner_id = %resource.owner_id(), "Ownership check failed");
        Err(AppError::forbidden(message))
    }
}
