// tests/support/mocks/organization_repo.rs
use super::paging::slice_page;
use async_trait::async_trait;
use identity_backoffice::domain::entity::{Change, ChangeSet, EntityStore};
use identity_backoffice::domain::errors::{DomainError, DomainResult};
use identity_backoffice::domain::organization::{
    Organization, OrganizationFilter, OrganizationId, OrganizationRepository, OrganizationSlug,
    OrganizationSortField, OrganizationSummary,
};
use identity_backoffice::domain::query::{PageQuery, PagedSource};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Organization store enforcing slug uniqueness the way the database does.
#[derive(Default)]
pub struct InMemoryOrganizationRepo {
    organizations: Mutex<BTreeMap<OrganizationId, Organization>>,
    commits: AtomicUsize,
    finds: AtomicUsize,
}

impl InMemoryOrganizationRepo {
    pub fn with_organizations(organizations: impl IntoIterator<Item = Organization>) -> Self {
        let repo = Self::default();
        repo.organizations
            .lock()
            .unwrap()
            .extend(organizations.into_iter().map(|o| (o.id, o)));
        repo
    }

    pub fn get(&self, id: OrganizationId) -> Option<Organization> {
        self.organizations.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.organizations.lock().unwrap().len()
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    fn matching(&self, filter: &OrganizationFilter) -> Vec<OrganizationSummary> {
        self.organizations
            .lock()
            .unwrap()
            .values()
            .map(OrganizationSummary::from)
            .filter(|summary| filter.matches(summary))
            .collect()
    }
}

fn slug_clash(
    organizations: &BTreeMap<OrganizationId, Organization>,
    org: &Organization,
) -> bool {
    organizations
        .values()
        .any(|other| other.id != org.id && other.slug == org.slug)
}

#[async_trait]
impl EntityStore<Organization> for InMemoryOrganizationRepo {
    async fn find(
        &self,
        id: OrganizationId,
        _cancel: &CancellationToken,
    ) -> DomainResult<Option<Organization>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id))
    }

    async fn commit(
        &self,
        changes: ChangeSet<Organization>,
        _cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        let mut organizations = self.organizations.lock().unwrap();
        let mut staged = organizations.clone();
        let mut affected = 0;
        for change in changes {
            match change {
                Change::Add(org) | Change::Update(org) => {
                    if slug_clash(&staged, &org) {
                        return Err(DomainError::Conflict("organization slug already exists".into()));
                    }
                    affected += 1;
                    staged.insert(org.id, org);
                }
                Change::Remove(id) => {
                    if staged.remove(&id).is_some() {
                        affected += 1;
                    }
                }
            }
        }
        *organizations = staged;
        Ok(affected)
    }
}

#[async_trait]
impl PagedSource<OrganizationFilter, OrganizationSortField, OrganizationSummary>
    for InMemoryOrganizationRepo
{
    async fn fetch_slice(
        &self,
        query: &PageQuery<OrganizationFilter, OrganizationSortField>,
        _cancel: &CancellationToken,
    ) -> DomainResult<Vec<OrganizationSummary>> {
        Ok(slice_page(self.matching(&query.filter), &query.sort, &query.page))
    }

    async fn count_matching(
        &self,
        filter: &OrganizationFilter,
        _cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        Ok(self.matching(filter).len() as u64)
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepo {
    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
        _cancel: &CancellationToken,
    ) -> DomainResult<Option<Organization>> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .values()
            .find(|o| o.slug == *slug)
            .cloned())
    }
}
