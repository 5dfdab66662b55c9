use tokio_util::sync::CancellationToken;

use super::AuditLogWriter;
use crate::application::{
    dto::{AuditLogDto, AuditLogQuery, PaginatedResult},
    error::ServiceResult,
    pagination::paginate,
};
use crate::domain::audit::{AuditLog, AuditLogFilter, AuditSortField};
use crate::domain::query::{PageQuery, SearchTerm, SortKey};

impl AuditLogWriter {
    pub async fn query(
        &self,
        query: AuditLogQuery,
        cancel: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<AuditLogDto>> {
        let filter = AuditLogFilter {
            search: SearchTerm::parse(query.search.as_deref()),
            events: query.events,
            results: query.results,
        };
        let page_query = PageQuery::new(filter)
            .with_sort(query.sort)
            .or_default_sort(SortKey::desc(AuditSortField::CreatedAt))
            .with_page(self.limits.request(query.page, query.page_size));

        let page: PaginatedResult<AuditLog> = paginate(self.repo.as_ref(), &page_query, cancel).await?;
        Ok(page.map(AuditLogDto::from))
    }
}
