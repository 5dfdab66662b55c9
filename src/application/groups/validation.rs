use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::{
    error::{FieldError, ValidationErrors},
    pipeline::{EntityValidator, Transition},
};
use crate::domain::errors::DomainResult;
use crate::domain::group::{Group, GroupId, GroupRepository};

// Upper bound on parent links followed when looking for cycles.
const MAX_HIERARCHY_DEPTH: usize = 64;

pub struct GroupValidator {
    repo: Arc<dyn GroupRepository>,
}

impl GroupValidator {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    async fn check_parent(
        &self,
        group: &Group,
        parent_id: GroupId,
        cancel: &CancellationToken,
    ) -> DomainResult<Option<FieldError>> {
        if parent_id == group.id {
            return Ok(Some(FieldError::new(
                "parent_id",
                "a group cannot be its own parent",
            )));
        }

        let Some(parent) = self.repo.find(parent_id, cancel).await? else {
            return Ok(Some(FieldError::new("parent_id", "parent group not found")));
        };
        if parent.organization_id != group.organization_id {
            return Ok(Some(FieldError::new(
                "parent_id",
                "parent group belongs to another organization",
            )));
        }

        let mut next = parent.parent_id;
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let Some(ancestor_id) = next else {
                return Ok(None);
            };
            if ancestor_id == group.id {
                return Ok(Some(FieldError::new(
                    "parent_id",
                    "parent group is a descendant of this group",
                )));
            }
            next = match self.repo.find(ancestor_id, cancel).await? {
                Some(ancestor) => ancestor.parent_id,
                None => None,
            };
        }

        Ok(Some(FieldError::new(
            "parent_id",
            "group hierarchy is too deep",
        )))
    }
}

#[async_trait]
impl EntityValidator<Group> for GroupValidator {
    async fn validate(
        &self,
        transition: &Transition<Group>,
        cancel: &CancellationToken,
    ) -> DomainResult<ValidationErrors> {
        let (group, exclude) = match transition {
            Transition::Insert(group) => (group, None),
            Transition::Update(group) => (group, Some(group.id)),
            Transition::Delete(_) => return Ok(Vec::new()),
        };

        let mut errors = Vec::new();

        if group.owner_id.is_none() {
            errors.push(FieldError::new("owner_id", "an owner is required"));
        }

        if let Some(parent_id) = group.parent_id {
            if let Some(error) = self.check_parent(group, parent_id, cancel).await? {
                errors.push(error);
            }
        }

        if self
            .repo
            .name_taken(group.organization_id, &group.name, exclude, cancel)
            .await?
        {
            errors.push(FieldError::new(
                "name",
                format!(
                    "a group named '{}' already exists in this organization",
                    group.name
                ),
            ));
        }

        Ok(errors)
    }
}
