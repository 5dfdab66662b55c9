// src/domain/group/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::query::SortField;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

const MAX_GROUP_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<GroupId> for Uuid {
    fn from(value: GroupId) -> Self {
        value.0
    }
}

impl FromStr for GroupId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::validation("id", "group id must be a uuid"))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::validation("name", "group name cannot be empty"));
        }
        if value.chars().count() > MAX_GROUP_NAME_LEN {
            return Err(DomainError::validation(
                "name",
                format!("group name must be at most {MAX_GROUP_NAME_LEN} characters"),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupName> for String {
    fn from(value: GroupName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSortField {
    Name,
    Description,
    Active,
    CreatedAt,
    UpdatedAt,
}

impl SortField for GroupSortField {
    fn column(&self) -> &'static str {
        match self {
            GroupSortField::Name => "g.name",
            GroupSortField::Description => "g.description",
            GroupSortField::Active => "g.active",
            GroupSortField::CreatedAt => "g.created_at",
            GroupSortField::UpdatedAt => "g.updated_at",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "name" => Some(GroupSortField::Name),
            "description" => Some(GroupSortField::Description),
            "active" => Some(GroupSortField::Active),
            "created_at" | "createdat" => Some(GroupSortField::CreatedAt),
            "updated_at" | "updatedat" => Some(GroupSortField::UpdatedAt),
            _ => None,
        }
    }
}
