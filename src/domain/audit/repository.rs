use crate::domain::audit::entity::{AuditLog, AuditLogFilter, AuditSortField, NewAuditLog};
use crate::domain::errors::DomainResult;
use crate::domain::query::PagedSource;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Append-only store. Records are never updated or deleted through this trait.
#[async_trait]
pub trait AuditLogRepository: PagedSource<AuditLogFilter, AuditSortField, AuditLog> {
    /// Returns whether the record was committed.
    async fn append(&self, log: NewAuditLog, cancel: &CancellationToken) -> DomainResult<bool>;
}
