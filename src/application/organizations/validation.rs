use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::{
    error::{FieldError, ValidationErrors},
    pipeline::{EntityValidator, Transition},
};
use crate::domain::errors::DomainResult;
use crate::domain::organization::Organization;

/// Only the slug is checked here. Further organization rules belong in this
/// validator.
pub struct OrganizationValidator;

#[async_trait]
impl EntityValidator<Organization> for OrganizationValidator {
    async fn validate(
        &self,
        transition: &Transition<Organization>,
        _cancel: &CancellationToken,
    ) -> DomainResult<ValidationErrors> {
        let mut errors = Vec::new();
        if let Some(org) = transition.entity() {
            if org.slug.as_str().trim().is_empty() {
                errors.push(FieldError::new("slug", "slug is required"));
            }
        }
        Ok(errors)
    }
}
