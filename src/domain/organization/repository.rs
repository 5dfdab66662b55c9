// src/domain/organization/repository.rs
use crate::domain::entity::EntityStore;
use crate::domain::errors::DomainResult;
use crate::domain::organization::entity::{Organization, OrganizationFilter, OrganizationSummary};
use crate::domain::organization::value_objects::{OrganizationSlug, OrganizationSortField};
use crate::domain::query::PagedSource;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait OrganizationRepository:
    EntityStore<Organization> + PagedSource<OrganizationFilter, OrganizationSortField, OrganizationSummary>
{
    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
        cancel: &CancellationToken,
    ) -> DomainResult<Option<Organization>>;
}
