// src/application/ports/identity.rs
use crate::application::context::Principal;
use async_trait::async_trait;

/// Fallback lookup used when the principal carries no usable subject or
/// name claim.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn subject_id(&self, principal: &Principal) -> Option<String>;

    async fn user_name(&self, principal: &Principal) -> Option<String>;
}
