// src/domain/group/repository.rs
use crate::domain::entity::EntityStore;
use crate::domain::errors::DomainResult;
use crate::domain::group::entity::{Group, GroupFilter, GroupSummary};
use crate::domain::group::value_objects::{GroupId, GroupName, GroupSortField};
use crate::domain::organization::OrganizationId;
use crate::domain::query::PagedSource;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Committing a `Change::Update(group)` replaces the stored membership rows
/// with `group.members` (delete-all, then insert).
#[async_trait]
pub trait GroupRepository:
    EntityStore<Group> + PagedSource<GroupFilter, GroupSortField, GroupSummary>
{
    /// Whether a group (active or not) named `name` exists in the organization,
    /// ignoring `exclude`.
    async fn name_taken(
        &self,
        organization_id: OrganizationId,
        name: &GroupName,
        exclude: Option<GroupId>,
        cancel: &CancellationToken,
    ) -> DomainResult<bool>;
}
