// tests/support/mocks/group_repo.rs
use super::paging::slice_page;
use async_trait::async_trait;
use identity_backoffice::domain::entity::{Change, ChangeSet, EntityStore};
use identity_backoffice::domain::errors::{DomainError, DomainResult};
use identity_backoffice::domain::group::{
    Group, GroupFilter, GroupId, GroupName, GroupRepository, GroupSortField, GroupSummary,
};
use identity_backoffice::domain::organization::OrganizationId;
use identity_backoffice::domain::query::{PageQuery, PagedSource};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Group store keyed by id. Counts commits, slice fetches and count
/// queries; `fail_commits` makes every commit return a persistence error.
#[derive(Default)]
pub struct InMemoryGroupRepo {
    groups: Mutex<BTreeMap<GroupId, Group>>,
    pub fail_commits: AtomicBool,
    commits: AtomicUsize,
    fetches: AtomicUsize,
    counts: AtomicUsize,
    member_rewrites: AtomicUsize,
}

impl InMemoryGroupRepo {
    pub fn with_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let repo = Self::default();
        repo.groups
            .lock()
            .unwrap()
            .extend(groups.into_iter().map(|mut g| {
                g.members_replaced = false;
                (g.id, g)
            }));
        repo
    }

    pub fn get(&self, id: GroupId) -> Option<Group> {
        self.groups.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    /// Updates that rewrote the membership rows.
    pub fn member_rewrites(&self) -> usize {
        self.member_rewrites.load(Ordering::SeqCst)
    }

    fn matching(&self, filter: &GroupFilter) -> Vec<GroupSummary> {
        self.groups
            .lock()
            .unwrap()
            .values()
            .map(GroupSummary::from)
            .filter(|summary| filter.matches(summary))
            .collect()
    }
}

#[async_trait]
impl EntityStore<Group> for InMemoryGroupRepo {
    async fn find(&self, id: GroupId, _cancel: &CancellationToken) -> DomainResult<Option<Group>> {
        Ok(self.get(id))
    }

    async fn commit(&self, changes: ChangeSet<Group>, _cancel: &CancellationToken) -> DomainResult<u64> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("connection reset".into()));
        }

        let mut groups = self.groups.lock().unwrap();
        let mut affected = 0;
        for change in changes {
            match change {
                Change::Add(mut group) => {
                    affected += 1 + group.members.len() as u64;
                    group.members_replaced = false;
                    groups.insert(group.id, group);
                }
                Change::Update(mut group) => {
                    if let Some(existing) = groups.get_mut(&group.id) {
                        affected += 1;
                        if group.members_replaced {
                            self.member_rewrites.fetch_add(1, Ordering::SeqCst);
                            affected += (existing.members.len() + group.members.len()) as u64;
                        } else {
                            group.members = existing.members.clone();
                        }
                        group.members_replaced = false;
                        *existing = group;
                    }
                }
                Change::Remove(id) => {
                    if groups.remove(&id).is_some() {
                        affected += 1;
                    }
                }
            }
        }
        Ok(affected)
    }
}

#[async_trait]
impl PagedSource<GroupFilter, GroupSortField, GroupSummary> for InMemoryGroupRepo {
    async fn fetch_slice(
        &self,
        query: &PageQuery<GroupFilter, GroupSortField>,
        _cancel: &CancellationToken,
    ) -> DomainResult<Vec<GroupSummary>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(slice_page(self.matching(&query.filter), &query.sort, &query.page))
    }

    async fn count_matching(
        &self,
        filter: &GroupFilter,
        _cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching(filter).len() as u64)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepo {
    async fn name_taken(
        &self,
        organization_id: OrganizationId,
        name: &GroupName,
        exclude: Option<GroupId>,
        _cancel: &CancellationToken,
    ) -> DomainResult<bool> {
        Ok(self.groups.lock().unwrap().values().any(|g| {
            g.organization_id == organization_id && g.name == *name && Some(g.id) != exclude
        }))
    }
}
