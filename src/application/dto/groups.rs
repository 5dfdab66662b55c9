use crate::domain::group::{Group, GroupId, GroupSortField, GroupSummary, GroupUser};
use crate::domain::organization::OrganizationId;
use crate::domain::query::SortKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMemberDto {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&GroupUser> for GroupMemberDto {
    fn from(member: &GroupUser) -> Self {
        Self {
            user_id: member.user_id.into(),
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub members: Vec<GroupMemberDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            id: group.id.into(),
            organization_id: group.organization_id.into(),
            parent_id: group.parent_id.map(Into::into),
            name: group.name.to_string(),
            description: group.description,
            owner_id: group.owner_id.map(Into::into),
            active: group.active,
            members: group.members.iter().map(GroupMemberDto::from).collect(),
            created_at: group.stamp.created_at,
            updated_at: group.stamp.updated_at,
            updated_by: group.stamp.updated_by.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummaryDto {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<GroupSummary> for GroupSummaryDto {
    fn from(summary: GroupSummary) -> Self {
        Self {
            id: summary.id.into(),
            organization_id: summary.organization_id.into(),
            parent_id: summary.parent_id.map(Into::into),
            name: summary.name,
            description: summary.description,
            owner_id: summary.owner_id.map(Into::into),
            active: summary.active,
            member_count: summary.member_count,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupBrowseQuery {
    pub organization_id: Option<OrganizationId>,
    pub search: Option<String>,
    pub active_only: bool,
    pub sort: Vec<SortKey<GroupSortField>>,
    pub page: u32,
    pub page_size: u32,
}

pub struct CreateGroupCommand {
    pub organization_id: OrganizationId,
    pub parent_id: Option<GroupId>,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub members: Vec<Uuid>,
}

/// Full replacement of the editable fields. `members: None` leaves the
/// membership untouched; `Some(list)` replaces it entirely.
pub struct UpdateGroupCommand {
    pub id: GroupId,
    pub parent_id: Option<GroupId>,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub members: Option<Vec<Uuid>>,
}
