// src/domain/group/entity.rs
use crate::domain::entity::{AuditStamp, Entity};
use crate::domain::group::value_objects::{GroupId, GroupName, GroupSortField};
use crate::domain::organization::OrganizationId;
use crate::domain::query::{SearchTerm, Sortable};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Membership row linking a user to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUser {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub organization_id: OrganizationId,
    pub parent_id: Option<GroupId>,
    pub name: GroupName,
    pub description: Option<String>,
    pub owner_id: Option<UserId>,
    pub members: Vec<GroupUser>,
    /// Set by [`Group::replace_members`]; storage rewrites membership rows
    /// on update only when it is set.
    pub members_replaced: bool,
    pub active: bool,
    pub stamp: AuditStamp,
}

impl Group {
    pub fn member_ids(&self) -> Vec<UserId> {
        self.members.iter().map(|m| m.user_id).collect()
    }

    /// Drops every existing membership row and creates a fresh one per user.
    /// Retained members are re-stamped with `at`; their original join time
    /// is not preserved.
    pub fn replace_members(&mut self, users: impl IntoIterator<Item = UserId>, at: DateTime<Utc>) {
        let mut seen = HashSet::new();
        self.members = users
            .into_iter()
            .filter(|user_id| seen.insert(*user_id))
            .map(|user_id| GroupUser {
                group_id: self.id,
                user_id,
                created_at: at,
            })
            .collect();
        self.members_replaced = true;
    }
}

impl Entity for Group {
    type Id = GroupId;

    const KIND: &'static str = "group";

    fn id(&self) -> GroupId {
        self.id
    }

    fn label(&self) -> String {
        self.name.to_string()
    }

    fn stamp_mut(&mut self) -> &mut AuditStamp {
        &mut self.stamp
    }
}

/// Lightweight projection returned by group listings.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub id: GroupId,
    pub organization_id: OrganizationId,
    pub parent_id: Option<GroupId>,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<UserId>,
    pub active: bool,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Group> for GroupSummary {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            organization_id: group.organization_id,
            parent_id: group.parent_id,
            name: group.name.to_string(),
            description: group.description.clone(),
            owner_id: group.owner_id,
            active: group.active,
            member_count: group.members.len() as i64,
            created_at: group.stamp.created_at,
            updated_at: group.stamp.updated_at,
        }
    }
}

impl Sortable<GroupSortField> for GroupSummary {
    fn compare_by(&self, other: &Self, field: GroupSortField) -> Ordering {
        match field {
            GroupSortField::Name => self.name.cmp(&other.name),
            GroupSortField::Description => self.description.cmp(&other.description),
            GroupSortField::Active => self.active.cmp(&other.active),
            GroupSortField::CreatedAt => self.created_at.cmp(&other.created_at),
            GroupSortField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub organization_id: Option<OrganizationId>,
    pub search: Option<SearchTerm>,
    pub active_only: bool,
}

impl GroupFilter {
    /// Reference predicate for backends that filter rows in memory; SQL
    /// backends must express the same conditions.
    pub fn matches(&self, group: &GroupSummary) -> bool {
        if let Some(org) = self.organization_id {
            if group.organization_id != org {
                return false;
            }
        }
        if self.active_only && !group.active {
            return false;
        }
        match &self.search {
            Some(term) => term.matches_any([Some(group.name.as_str()), group.description.as_deref()]),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::new(Uuid::new_v4()).unwrap()
    }

    #[test]
    fn replace_members_collapses_duplicates_and_restamps() {
        let (a, b) = (user(), user());
        let earlier = Utc::now() - chrono::Duration::days(3);
        let now = Utc::now();
        let mut group = Group {
            id: GroupId::generate(),
            organization_id: OrganizationId::generate(),
            parent_id: None,
            name: GroupName::new("ops").unwrap(),
            description: None,
            owner_id: Some(a),
            members: vec![],
            members_replaced: false,
            active: true,
            stamp: AuditStamp::new(earlier),
        };
        group.replace_members([a], earlier);
        group.replace_members([a, b, a], now);
        assert!(group.members_replaced);

        assert_eq!(group.member_ids(), vec![a, b]);
        assert!(group.members.iter().all(|m| m.created_at == now));
    }

    fn summary(name: &str, description: Option<&str>) -> GroupSummary {
        GroupSummary {
            id: GroupId::generate(),
            organization_id: OrganizationId::generate(),
            parent_id: None,
            name: name.into(),
            description: description.map(Into::into),
            owner_id: None,
            active: true,
            member_count: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    // Postgres orders with NULLS FIRST on ASC and NULLS LAST on DESC.
    #[test]
    fn missing_description_sorts_as_smallest() {
        use crate::domain::query::{SortKey, sort_by_keys};

        let mut rows = vec![summary("a", Some("x")), summary("b", None), summary("c", Some("m"))];
        sort_by_keys(&mut rows, &[SortKey::asc(GroupSortField::Description)]);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        sort_by_keys(&mut rows, &[SortKey::desc(GroupSortField::Description)]);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
