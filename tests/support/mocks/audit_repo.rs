// tests/support/mocks/audit_repo.rs
use super::paging::slice_page;
use async_trait::async_trait;
use identity_backoffice::domain::audit::{
    AuditLog, AuditLogFilter, AuditLogRepository, AuditSortField, NewAuditLog,
};
use identity_backoffice::domain::errors::{DomainError, DomainResult};
use identity_backoffice::domain::query::{PageQuery, PagedSource};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Append-only log. `reject` makes appends report "not committed",
/// `fail` makes them error.
#[derive(Default)]
pub struct InMemoryAuditRepo {
    logs: Mutex<Vec<AuditLog>>,
    pub reject: AtomicBool,
    pub fail: AtomicBool,
    counts: AtomicUsize,
}

impl InMemoryAuditRepo {
    pub fn entries(&self) -> Vec<AuditLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.logs.lock().unwrap().len()
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    fn matching(&self, filter: &AuditLogFilter) -> Vec<AuditLog> {
        // Newest id first so equal sort keys keep the database tie-break.
        let mut rows: Vec<AuditLog> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows
    }
}

#[async_trait]
impl PagedSource<AuditLogFilter, AuditSortField, AuditLog> for InMemoryAuditRepo {
    async fn fetch_slice(
        &self,
        query: &PageQuery<AuditLogFilter, AuditSortField>,
        _cancel: &CancellationToken,
    ) -> DomainResult<Vec<AuditLog>> {
        Ok(slice_page(self.matching(&query.filter), &query.sort, &query.page))
    }

    async fn count_matching(
        &self,
        filter: &AuditLogFilter,
        _cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching(filter).len() as u64)
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepo {
    async fn append(&self, log: NewAuditLog, _cancel: &CancellationToken) -> DomainResult<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("audit table unavailable".into()));
        }
        if self.reject.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut logs = self.logs.lock().unwrap();
        let id = logs.len() as i64 + 1;
        logs.push(AuditLog::from_new(id, log));
        Ok(true)
    }
}
