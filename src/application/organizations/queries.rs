use tokio_util::sync::CancellationToken;

use super::OrganizationService;
use crate::application::{
    context::RequestContext,
    dto::{OrganizationBrowseQuery, OrganizationDto, OrganizationSummaryDto, PaginatedResult},
    error::{ErrorSink, ServiceResult},
    pagination::paginate,
};
use crate::domain::organization::{
    Organization, OrganizationFilter, OrganizationId, OrganizationSortField, OrganizationSummary,
};
use crate::domain::query::{PageQuery, SearchTerm, SortKey};

impl OrganizationService {
    pub async fn browse(
        &self,
        query: OrganizationBrowseQuery,
        cancel: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<OrganizationSummaryDto>> {
        let filter = OrganizationFilter {
            search: SearchTerm::parse(query.search.as_deref()),
            active_only: query.active_only,
        };
        let page_query = PageQuery::new(filter)
            .with_sort(query.sort)
            .or_default_sort(SortKey::asc(OrganizationSortField::Name))
            .with_page(self.limits.request(query.page, query.page_size));

        let page: PaginatedResult<OrganizationSummary> =
            paginate(self.repo.as_ref(), &page_query, cancel).await?;
        Ok(page.map(OrganizationSummaryDto::from))
    }

    pub async fn read(
        &self,
        id: OrganizationId,
        cancel: &CancellationToken,
    ) -> ServiceResult<Organization> {
        match self.repo.find(id, cancel).await? {
            Some(org) => Ok(org),
            None => Err(ErrorSink::not_found(format!("organization {id} not found"))),
        }
    }

    /// Served from the context cache when possible.
    pub async fn read_model(
        &self,
        ctx: &RequestContext,
        id: OrganizationId,
        cancel: &CancellationToken,
    ) -> ServiceResult<OrganizationDto> {
        if let Some(model) = self.cached_model(ctx, id).await {
            return Ok(model);
        }
        let model = OrganizationDto::from(self.read(id, cancel).await?);
        self.store_model(ctx, &model).await;
        Ok(model)
    }
}
