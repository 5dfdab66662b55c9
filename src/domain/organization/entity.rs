// src/domain/organization/entity.rs
use crate::domain::entity::{AuditStamp, Entity};
use crate::domain::group::GroupId;
use crate::domain::organization::value_objects::{
    Address, OrganizationId, OrganizationName, OrganizationSlug, OrganizationSortField,
};
use crate::domain::query::{SearchTerm, Sortable};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Child group reference loaded alongside an organization. Read-only from
/// the organization's point of view; groups are written through their own
/// repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationGroup {
    pub id: GroupId,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Organization {
    pub id: OrganizationId,
    pub slug: OrganizationSlug,
    pub name: OrganizationName,
    pub address: Address,
    pub owner_id: Option<UserId>,
    pub groups: Vec<OrganizationGroup>,
    pub active: bool,
    pub stamp: AuditStamp,
}

impl Entity for Organization {
    type Id = OrganizationId;

    const KIND: &'static str = "organization";

    fn id(&self) -> OrganizationId {
        self.id
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.slug)
    }

    fn stamp_mut(&mut self) -> &mut AuditStamp {
        &mut self.stamp
    }
}

#[derive(Debug, Clone)]
pub struct OrganizationSummary {
    pub id: OrganizationId,
    pub slug: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub owner_id: Option<UserId>,
    pub active: bool,
    pub group_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Organization> for OrganizationSummary {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id,
            slug: org.slug.to_string(),
            name: org.name.to_string(),
            city: org.address.city.clone(),
            country: org.address.country.clone(),
            owner_id: org.owner_id,
            active: org.active,
            group_count: org.groups.len() as i64,
            created_at: org.stamp.created_at,
        }
    }
}

impl Sortable<OrganizationSortField> for OrganizationSummary {
    fn compare_by(&self, other: &Self, field: OrganizationSortField) -> Ordering {
        match field {
            OrganizationSortField::Name => self.name.cmp(&other.name),
            OrganizationSortField::Slug => self.slug.cmp(&other.slug),
            OrganizationSortField::City => self.city.cmp(&other.city),
            OrganizationSortField::Country => self.country.cmp(&other.country),
            OrganizationSortField::Active => self.active.cmp(&other.active),
            OrganizationSortField::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationFilter {
    pub search: Option<SearchTerm>,
    pub active_only: bool,
}

impl OrganizationFilter {
    pub fn matches(&self, org: &OrganizationSummary) -> bool {
        if self.active_only && !org.active {
            return false;
        }
        match &self.search {
            Some(term) => term.matches_any([
                Some(org.name.as_str()),
                Some(org.slug.as_str()),
                org.city.as_deref(),
                org.country.as_deref(),
            ]),
            None => true,
        }
    }
}
