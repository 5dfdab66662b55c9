// src/domain/entity.rs
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Creation and modification metadata carried by every persistable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<UserId>,
}

impl AuditStamp {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at: None,
            updated_by: None,
        }
    }

    pub fn touch(&mut self, at: DateTime<Utc>, by: Option<UserId>) {
        self.updated_at = Some(at);
        self.updated_by = by;
    }
}

pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Short lowercase name used in audit messages and logs, e.g. `group`.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    /// Human readable label used when describing the entity in audit messages.
    fn label(&self) -> String;

    fn stamp_mut(&mut self) -> &mut AuditStamp;
}

#[derive(Debug, Clone)]
pub enum Change<E: Entity> {
    Add(E),
    Update(E),
    Remove(E::Id),
}

/// Pending registrations handed to [`EntityStore::commit`] as one unit.
#[derive(Debug, Clone)]
pub struct ChangeSet<E: Entity> {
    changes: Vec<Change<E>>,
}

impl<E: Entity> Default for ChangeSet<E> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<E: Entity> ChangeSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: E) -> &mut Self {
        self.changes.push(Change::Add(entity));
        self
    }

    pub fn update(&mut self, entity: E) -> &mut Self {
        self.changes.push(Change::Update(entity));
        self
    }

    pub fn remove(&mut self, id: E::Id) -> &mut Self {
        self.changes.push(Change::Remove(id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change<E>> {
        self.changes.iter()
    }
}

impl<E: Entity> IntoIterator for ChangeSet<E> {
    type Item = Change<E>;
    type IntoIter = std::vec::IntoIter<Change<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Storage seam for one entity type. `commit` applies every registered
/// change atomically and reports the number of affected rows.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn find(&self, id: E::Id, cancel: &CancellationToken) -> DomainResult<Option<E>>;

    async fn commit(&self, changes: ChangeSet<E>, cancel: &CancellationToken) -> DomainResult<u64>;
}
