use crate::domain::organization::{
    Address, Organization, OrganizationGroup, OrganizationId, OrganizationSortField,
    OrganizationSummary,
};
use crate::domain::query::SortKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationGroupDto {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

impl From<OrganizationGroup> for OrganizationGroupDto {
    fn from(group: OrganizationGroup) -> Self {
        Self {
            id: group.id.into(),
            name: group.name,
            active: group.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub address: Address,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub groups: Vec<OrganizationGroupDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

impl From<Organization> for OrganizationDto {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id.into(),
            slug: org.slug.to_string(),
            name: org.name.to_string(),
            address: org.address,
            owner_id: org.owner_id.map(Into::into),
            active: org.active,
            groups: org.groups.into_iter().map(Into::into).collect(),
            created_at: org.stamp.created_at,
            updated_at: org.stamp.updated_at,
            updated_by: org.stamp.updated_by.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummaryDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub owner_id: Option<Uuid>,
    pub active: bool,
    pub group_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<OrganizationSummary> for OrganizationSummaryDto {
    fn from(summary: OrganizationSummary) -> Self {
        Self {
            id: summary.id.into(),
            slug: summary.slug,
            name: summary.name,
            city: summary.city,
            country: summary.country,
            owner_id: summary.owner_id.map(Into::into),
            active: summary.active,
            group_count: summary.group_count,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationBrowseQuery {
    pub search: Option<String>,
    pub active_only: bool,
    pub sort: Vec<SortKey<OrganizationSortField>>,
    pub page: u32,
    pub page_size: u32,
}

pub struct CreateOrganizationCommand {
    pub name: String,
    /// Derived from `name` when absent or blank.
    pub slug: Option<String>,
    pub address: Address,
    pub owner_id: Option<Uuid>,
    pub active: bool,
}

/// `slug: None` keeps the current slug.
pub struct UpdateOrganizationCommand {
    pub id: OrganizationId,
    pub name: String,
    pub slug: Option<String>,
    pub address: Address,
    pub owner_id: Option<Uuid>,
    pub active: bool,
}
